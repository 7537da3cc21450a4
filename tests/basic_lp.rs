#![allow(non_snake_case)]

use splitcone::{algebra::*, solver::*};

fn quiet_settings() -> Settings<f64> {
    SettingsBuilder::<f64>::default()
        .eps(1e-6)
        .verbose(false)
        .build()
        .unwrap()
}

#[allow(clippy::type_complexity)]
fn basic_lp_data() -> (CscMatrix<f64>, Vec<f64>, Vec<f64>, Vec<SupportedConeT>) {
    // box constraints -0.5 <= x <= 0.5, written as [2I; -2I]x <= 1
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
fn test_lp_trivial() {
    // min -x  s.t.  x + s = 1, s >= 0
    let A = CscMatrix::from(&[[1.0]]);
    let b = vec![1.];
    let c = vec![-1.];
    let cones = vec![SupportedConeT::NonnegativeConeT(1)];

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let status = solver.solve();

    assert_eq!(status, SolverStatus::Solved);
    assert_eq!(status.code(), 1);
    assert!((solver.solution.x[0] - 1.0).abs() < 1e-3);
    assert!((solver.info.pobj + 1.0).abs() < 1e-3);
}

#[test]
fn test_lp_feasible() {
    let (A, b, c, cones) = basic_lp_data();

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let status = solver.solve();

    assert_eq!(status, SolverStatus::Solved);

    let refsol = vec![-0.5, 0.5, -0.5];
    assert!(solver.solution.x.dist(&refsol) <= 1e-3);

    let refobj = -3.;
    assert!((solver.info.pobj - refobj).abs() <= 1e-3);

    // duality gap and residuals are below tolerance
    assert!(solver.info.rel_gap <= 1e-5);
    assert!(solver.info.res_pri <= 1e-5);
    assert!(solver.info.res_dual <= 1e-5);

    // slacks satisfy the constraints
    let mut axs = solver.solution.s.clone();
    A.gemv(&mut axs, &solver.solution.x, 1., 1.);
    assert!(axs.dist(&b) <= 1e-3);
}

#[test]
fn test_lp_primal_infeasible() {
    // x <= 1 and x >= 2 simultaneously
    let A = CscMatrix::from(&[
        [1.0],  //
        [-1.0], //
    ]);
    let b = vec![1., -2.];
    let c = vec![1.];
    let cones = vec![SupportedConeT::NonnegativeConeT(2)];

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let status = solver.solve();

    assert_eq!(status, SolverStatus::Infeasible);
    assert_eq!(status.code(), -2);

    // y is a Farkas certificate: y in K*, b'y < 0, |A'y| small
    let y = &solver.solution.y;
    assert!(y.iter().all(|&yi| yi >= -1e-6));
    let bty: f64 = std::iter::zip(&b, y).map(|(b, y)| b * y).sum();
    assert!(bty < 0.);
    let aty = y[0] - y[1];
    assert!(aty.abs() < 1e-3);

    // x and s are NaN on infeasibility, objectives follow the convention
    assert!(solver.solution.x.iter().all(|x| x.is_nan()));
    assert!(solver.solution.s.iter().all(|s| s.is_nan()));
    assert!(solver.info.pobj.is_nan());
}

#[test]
fn test_lp_dual_infeasible() {
    // min -x  s.t.  -x + s = 0, s >= 0, i.e. x >= 0 unbounded below
    let A = CscMatrix::from(&[[-1.0]]);
    let b = vec![0.];
    let c = vec![-1.];
    let cones = vec![SupportedConeT::NonnegativeConeT(1)];

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let status = solver.solve();

    assert_eq!(status, SolverStatus::Unbounded);
    assert_eq!(status.code(), -1);

    // x is an unboundedness certificate: c'x < 0 with Ax + s small
    let x = &solver.solution.x;
    let s = &solver.solution.s;
    assert!(-x[0] < 0.);
    assert!((s[0] - x[0]).abs() < 1e-3); // Ax + s = s - x
    assert!(s[0] >= -1e-6);

    assert!(solver.solution.y.iter().all(|y| y.is_nan()));
    assert!(solver.info.dobj.is_nan());
}

#[test]
fn test_cold_start_determinism() {
    let (A, b, c, cones) = basic_lp_data();

    let mut solver1 = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let mut solver2 = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    solver1.solve();
    solver2.solve();

    assert_eq!(solver1.info.iterations, solver2.info.iterations);
    assert_eq!(solver1.solution.x, solver2.solution.x);
    assert_eq!(solver1.solution.y, solver2.solution.y);
    assert_eq!(solver1.solution.s, solver2.solution.s);
}

#[test]
fn test_eps_zero_runs_to_max_iter() {
    let (A, b, c, cones) = basic_lp_data();

    let settings = SettingsBuilder::<f64>::default()
        .eps(0.0)
        .max_iter(50)
        .verbose(false)
        .build()
        .unwrap();

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, settings).unwrap();
    let status = solver.solve();

    assert_eq!(solver.info.iterations, 50);
    assert!(solver.info.hit_max_iters);
    assert_ne!(status.code(), 0);
    assert_ne!(status, SolverStatus::Failure);
}

#[test]
fn test_failure_default_return() {
    // 1 x 2 problem: m < n fails validation
    let A = CscMatrix::new(1, 2, vec![0, 1, 2], vec![0, 0], vec![1., 1.]);
    let b = vec![1.];
    let c = vec![1., 1.];
    let cones = vec![SupportedConeT::NonnegativeConeT(1)];

    let (sol, info) = solve(&A, &b, &c, &cones, quiet_settings());

    assert_eq!(info.status, SolverStatus::Failure);
    assert_eq!(info.status.code(), -4);
    assert!(info.pobj.is_nan());
    assert!(info.dobj.is_nan());
    assert!(info.res_pri.is_nan());
    assert!(info.res_dual.is_nan());
    assert!(info.rel_gap.is_nan());

    // vectors are allocated at the problem dimensions and NaN filled
    assert_eq!(sol.x.len(), 2);
    assert_eq!(sol.y.len(), 1);
    assert_eq!(sol.s.len(), 1);
    assert!(sol.x.iter().all(|v| v.is_nan()));
    assert!(sol.y.iter().all(|v| v.is_nan()));
    assert!(sol.s.iter().all(|v| v.is_nan()));
}

#[test]
fn test_square_problem_accepted() {
    // m = n is a legal shape: max x1 + x2 subject to x <= 1
    let A = CscMatrix::<f64>::identity(2);
    let b = vec![1., 1.];
    let c = vec![-1., -1.];
    let cones = vec![SupportedConeT::NonnegativeConeT(2)];

    let mut solver = SplitConeSolver::new(&A, &b, &c, &cones, quiet_settings()).unwrap();
    let status = solver.solve();
    assert_eq!(status, SolverStatus::Solved);
    assert!(solver.solution.x.dist(&vec![1., 1.]) < 1e-3);
}
