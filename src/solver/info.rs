use crate::algebra::*;
use crate::solver::SolverStatus;

// ---------------
// solver information
// ---------------

/// Summary statistics reported after a solve.
#[derive(Debug, Clone)]
pub struct Info<T> {
    /// terminal solver status
    pub status: SolverStatus,
    /// number of iterations taken
    pub iterations: u32,
    /// solve time in seconds
    pub solve_time: f64,
    /// primal objective cᵀx (NaN on infeasibility; −1 after the
    /// unboundedness certificate is rescaled)
    pub pobj: T,
    /// dual objective −bᵀy (NaN on unboundedness; −1 after the
    /// infeasibility certificate is rescaled)
    pub dobj: T,
    /// primal residual, or the unboundedness certificate value
    pub res_pri: T,
    /// dual residual, or the infeasibility certificate value
    pub res_dual: T,
    /// relative duality gap
    pub rel_gap: T,
    /// whether the iteration limit was reached before the oracle fired
    pub hit_max_iters: bool,
}

impl<T> Info<T>
where
    T: FloatT,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Info record reported when setup or validation fails.
    pub fn failure() -> Self {
        Self {
            status: SolverStatus::Failure,
            iterations: 0,
            solve_time: f64::NAN,
            pobj: T::nan(),
            dobj: T::nan(),
            res_pri: T::nan(),
            res_dual: T::nan(),
            rel_gap: T::nan(),
            hit_max_iters: false,
        }
    }

    /// Status tag, with an inaccuracy hint when the iteration limit was
    /// reached before the termination oracle fired.
    pub fn status_string(&self) -> String {
        let base = self.status.to_string();
        match self.status {
            SolverStatus::Solved | SolverStatus::Unbounded | SolverStatus::Infeasible
                if self.hit_max_iters =>
            {
                format!("{}/Inaccurate", base)
            }
            _ => base,
        }
    }
}

impl<T> Default for Info<T>
where
    T: FloatT,
{
    fn default() -> Self {
        Self {
            status: SolverStatus::Unsolved,
            iterations: 0,
            solve_time: 0f64,
            pobj: T::nan(),
            dobj: T::nan(),
            res_pri: T::nan(),
            res_dual: T::nan(),
            rel_gap: T::nan(),
            hit_max_iters: false,
        }
    }
}
