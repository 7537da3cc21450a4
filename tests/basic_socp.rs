#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

fn quiet_settings() -> Settings<f64> {
    SettingsBuilder::<f64>::default()
        .eps(1e-6)
        .verbose(false)
        .build()
        .unwrap()
}

// minimize c'x subject to ‖x‖ <= 1, via s = (1, x) ∈ SOC(3)
#[allow(clippy::type_complexity)]
fn unit_ball_data(c: Vec<f64>) -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, Vec<SupportedConeT>) {
    let A = CscMatrix::from(&[
        [0., 0.],  //
        [-1., 0.], //
        [0., -1.], //
    ]);
    let b = vec![1., 0., 0.];
    let cones = vec![SupportedConeT::SecondOrderConeT(3)];

    (A, b, c, cones)
}

#[test]
fn test_socp_unit_ball() {
    // minimizer of a linear objective over the unit ball is -c/‖c‖
    let (A, b, c, cones) = unit_ball_data(vec![3., 4.]);

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let status = solver.solve();

    assert_eq!(status, SolverStatus::Solved);

    let refsol = vec![-0.6, -0.8];
    assert!(solver.solution.x.dist(&refsol) <= 1e-3);
    assert!((solver.info.pobj + 5.0).abs() <= 1e-3);
}

#[test]
fn test_socp_feasibility() {
    // zero objective: any point of the ball is optimal, and the
    // returned point must be feasible
    let (A, b, c, cones) = unit_ball_data(vec![0., 0.]);

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let status = solver.solve();

    assert_eq!(status, SolverStatus::Solved);
    assert!(solver.solution.x.norm() <= 1.0 + 1e-3);
    assert!(solver.info.pobj.abs() <= 1e-6);
}

#[test]
fn test_socp_indirect_solver() {
    // swapping the direct factorization for conjugate gradient is a
    // configuration choice and reaches the same point
    let (A, b, c, cones) = unit_ball_data(vec![3., 4.]);

    let settings = SettingsBuilder::<f64>::default()
        .eps(1e-6)
        .verbose(false)
        .direct(false)
        .build()
        .unwrap();

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, settings).unwrap();
    let status = solver.solve();

    assert_eq!(status, SolverStatus::Solved);
    assert!(solver.solution.x.dist(&vec![-0.6, -0.8]) <= 1e-3);
}

#[test]
fn test_mixed_cones() {
    // minimize -x2 subject to x1 = 0.5, ‖x‖ <= 1
    let A = CscMatrix::from(&[
        [1., 0.],  //
        [0., 0.],  //
        [-1., 0.], //
        [0., -1.], //
    ]);
    let b = vec![0.5, 1., 0., 0.];
    let c = vec![0., -1.];
    let cones = vec![
        SupportedConeT::ZeroConeT(1),
        SupportedConeT::SecondOrderConeT(3),
    ];

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let status = solver.solve();

    assert_eq!(status, SolverStatus::Solved);

    let refsol = vec![0.5, f64::sqrt(0.75)];
    assert!(solver.solution.x.dist(&refsol) <= 1e-3);
}
