#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::cones::{ConeSet, SupportedConeT};
use crate::solver::info_print;
use crate::solver::linsys::{make_linear_solver, LinearSolver, LinearSolverError};
use crate::solver::*;
use std::time::Instant;
use thiserror::Error;

// the termination oracle runs every CONVERGED_INTERVAL iterations, and a
// residual line is printed every PRINT_INTERVAL iterations when verbose
const CONVERGED_INTERVAL: u32 = 20;
const PRINT_INTERVAL: u32 = 100;

/// Error type returned when the solver cannot be constructed.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("linear solver setup failed: {0}")]
    LinearSolver(#[from] LinearSolverError),
}

/// Solver for problems in standard conic form
///
/// ```text
/// minimize        cᵀx
/// subject to      Ax + s = b
///                 s ∈ 𝒦
/// ```
///
/// The solver owns an internal copy of the problem data, so a solve can
/// be repeated (with warm starting, if enabled) without rebuilding.
pub struct SplitConeSolver<T = f64>
where
    T: FloatT,
{
    pub data: ProblemData<T>,
    pub cones: ConeSet<T>,
    pub settings: Settings<T>,
    pub info: Info<T>,
    pub solution: Solution<T>,

    pub(crate) workspace: Workspace<T>,
    pub(crate) residuals: Residuals<T>,
    linsys: Box<dyn LinearSolver<T>>,
}

impl<T> SplitConeSolver<T>
where
    T: FloatT,
{
    /// Validate the problem data, equilibrate an internal copy of it,
    /// and set up the cone and linear-subspace state.
    pub fn new(
        A: &CscMatrix<T>,
        b: &[T],
        c: &[T],
        cone_specs: &[SupportedConeT],
        settings: Settings<T>,
    ) -> Result<Self, SetupError> {
        let cones = ConeSet::<T>::new(cone_specs);
        let data = ProblemData::new(A, b, c, &cones, &settings)?;
        let linsys = make_linear_solver(&data.A, &settings)?;

        let (n, m) = (data.n, data.m);
        let workspace = Workspace::new(n, m);
        let residuals = Residuals::new(n, m);
        let solution = Solution::new(n, m);
        let info = Info::new();

        Ok(Self {
            data,
            cones,
            settings,
            info,
            solution,
            workspace,
            residuals,
            linsys,
        })
    }

    /// Run the operator-splitting iteration to termination.  Returns the
    /// terminal status, which is also recorded in
    /// [info](SplitConeSolver::info) and
    /// [solution](SplitConeSolver::solution).
    pub fn solve(&mut self) -> SolverStatus {
        let start = Instant::now();
        self.info = Info::new();

        // move b and c into the scaled space, recording their original
        // norms first, then set the starting point and the fixed
        // right-hand sides h, g of the subspace projection
        self.data.normalize_bc(&self.settings);

        if self.settings.warm_start {
            self.workspace
                .warm_start(&self.solution, &self.data, &self.settings);
        } else {
            self.workspace.cold_start();
        }
        self.workspace.prepare(&self.data, &mut self.linsys);

        if self.settings.verbose {
            info_print::print_header(&self.data, &self.cones, &self.settings, &self.linsys.method())
                .ok();
        }

        let mut iter = 0;
        while iter < self.settings.max_iter {
            self.workspace.u_prev.copy_from(&self.workspace.u);

            self.workspace
                .project_linear(&self.data, &mut self.linsys, &self.settings, iter);
            self.workspace.project_cones(&self.cones, &self.settings);
            self.workspace.update_dual(&self.settings);

            if iter % CONVERGED_INTERVAL == 0 {
                self.info.status =
                    self.residuals
                        .check_termination(&self.workspace, &self.data, &self.settings);
                if self.info.status != SolverStatus::Unsolved {
                    break;
                }
            }

            if self.settings.verbose && iter % PRINT_INTERVAL == 0 {
                info_print::print_summary(iter, &self.residuals, start.elapsed().as_secs_f64())
                    .ok();
            }

            iter += 1;
        }

        if self.settings.verbose {
            info_print::print_summary(iter, &self.residuals, start.elapsed().as_secs_f64()).ok();
        }

        self.info.iterations = iter;
        self.info.hit_max_iters = iter == self.settings.max_iter;

        // extract (x, y, s), classify a fall-through point, and fill in
        // the terminal residuals
        self.solution.post_process(
            &self.workspace,
            &mut self.residuals,
            &self.data,
            &mut self.info,
            &self.settings,
        );
        self.info.solve_time = start.elapsed().as_secs_f64();
        self.solution.solve_time = self.info.solve_time;

        if self.settings.verbose {
            info_print::print_footer(&self.info, &self.settings, self.linsys.summary()).ok();
        }

        // restore b and c, and map the solution to the original units
        self.data.unnormalize_bc(&self.settings);
        if self.settings.normalize {
            self.data.equilibration.unnormalize_sol(
                &mut self.solution.x,
                &mut self.solution.y,
                &mut self.solution.s,
            );
        }

        self.info.status
    }
}

/// One-shot solve.
///
/// Setup failures are reported through the returned
/// [Info](crate::solver::Info) as status `Failure`, with the solution
/// vectors allocated at the problem dimensions and filled with NaN.
pub fn solve<T: FloatT>(
    A: &CscMatrix<T>,
    b: &[T],
    c: &[T],
    cone_specs: &[SupportedConeT],
    settings: Settings<T>,
) -> (Solution<T>, Info<T>) {
    match SplitConeSolver::new(A, b, c, cone_specs, settings) {
        Ok(mut solver) => {
            solver.solve();
            (solver.solution, solver.info)
        }
        Err(e) => {
            eprintln!("splitcone setup failure: {}", e);
            (Solution::failure(c.len(), b.len()), Info::failure())
        }
    }
}
