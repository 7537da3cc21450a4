use crate::algebra::*;
use crate::solver::Settings;
use thiserror::Error;

mod direct;
mod indirect;
mod ldl;

pub use ldl::LdlError;

pub(crate) use direct::*;
pub(crate) use indirect::*;

/// Error type returned when the linear-subspace solver cannot be set up.
#[derive(Error, Debug)]
pub enum LinearSolverError {
    #[error("factorization of the subspace operator failed: {0}")]
    Factorization(#[from] LdlError),
}

/// Capability interface for the fixed quasidefinite subspace solve.
///
/// Implementations solve M z = rhs in place, with
///
/// ```text
/// M = [ ρI   Aᵀ ]
///     [  A   -I ]
/// ```
///
/// The iteration engine is agnostic to whether the implementation is a
/// cached direct factorization or an iterative method; swapping one for
/// the other is a configuration choice.
pub(crate) trait LinearSolver<T: FloatT>: Send {
    /// short description of the method for the verbose header
    fn method(&self) -> String;

    /// Solve M z = rhs in place.  `rhs` has length n + m.  `warm` is an
    /// optional warm start of which the first n + m entries are read.
    /// `iter` is the outer iteration count, or None during setup solves.
    fn solve(&mut self, A: &CscMatrix<T>, rhs: &mut [T], warm: Option<&[T]>, iter: Option<u32>);

    /// one-line solve statistics for the verbose footer.  Resets the
    /// underlying counters.
    fn summary(&mut self) -> Option<String>;
}

pub(crate) fn make_linear_solver<T: FloatT>(
    A: &CscMatrix<T>,
    settings: &Settings<T>,
) -> Result<Box<dyn LinearSolver<T>>, LinearSolverError> {
    if settings.direct {
        Ok(Box::new(DirectLdlSolver::new(A, settings.rho_x)?))
    } else {
        Ok(Box::new(IndirectCgSolver::new(
            A,
            settings.rho_x,
            settings.cg_rate,
            settings.cg_best_tol,
        )))
    }
}
