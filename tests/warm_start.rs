#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

#[allow(clippy::type_complexity)]
fn lp_data() -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, Vec<SupportedConeT>) {
    let A = CscMatrix::from(&[
        [2., 0., 0.],  //
        [0., 2., 0.],  //
        [0., 0., 2.],  //
        [-2., 0., 0.], //
        [0., -2., 0.], //
        [0., 0., -2.], //
    ]);
    let b = vec![1.; 6];
    let c = vec![3., -2., 1.];
    let cones = vec![SupportedConeT::NonnegativeConeT(6)];

    (A, b, c, cones)
}

#[test]
fn test_warm_start_resolve() {
    let (A, b, c, cones) = lp_data();

    // solve once to high accuracy from a cold start
    let settings = SettingsBuilder::<f64>::default()
        .eps(1e-8)
        .verbose(false)
        .build()
        .unwrap();
    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, settings).unwrap();
    assert_eq!(solver.solve(), SolverStatus::Solved);

    let cold_iters = solver.info.iterations;

    // re-solving from the terminal point converges within one
    // oracle sampling interval
    solver.settings.warm_start = true;
    solver.settings.eps = 1e-6;
    assert_eq!(solver.solve(), SolverStatus::Solved);

    assert!(solver.info.iterations <= 20);
    assert!(solver.info.iterations < cold_iters);

    let refsol = vec![-0.5, 0.5, -0.5];
    assert!(solver.solution.x.dist(&refsol) <= 1e-3);
}

#[test]
fn test_warm_start_without_normalization() {
    let (A, b, c, cones) = lp_data();

    let settings = SettingsBuilder::<f64>::default()
        .eps(1e-8)
        .normalize(false)
        .verbose(false)
        .build()
        .unwrap();
    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, settings).unwrap();
    assert_eq!(solver.solve(), SolverStatus::Solved);

    solver.settings.warm_start = true;
    solver.settings.eps = 1e-6;
    assert_eq!(solver.solve(), SolverStatus::Solved);
    assert!(solver.info.iterations <= 20);
}
