#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::{Info, ProblemData, Residuals, Settings, SolverStatus, Workspace};

// ---------------
// solution type
// ---------------

/// Terminal primal-dual point, or certificate.
///
/// On `Solved`, (x, y, s) is a primal-dual optimal triple.  On
/// `Unbounded`, (x, s) is an unboundedness certificate with y set to NaN;
/// on `Infeasible`, y is an infeasibility certificate with (x, s) set to
/// NaN; on `Indeterminate` and `Failure` all three are NaN.
#[derive(Debug, Clone)]
pub struct Solution<T> {
    /// primal variables
    pub x: Vec<T>,
    /// dual variables
    pub y: Vec<T>,
    /// primal slacks
    pub s: Vec<T>,
    /// final solver status
    pub status: SolverStatus,
    /// primal objective value
    pub obj_val: T,
    /// number of iterations
    pub iterations: u32,
    /// solve time in seconds
    pub solve_time: f64,
}

impl<T> Solution<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            y: vec![T::zero(); m],
            s: vec![T::zero(); m],
            status: SolverStatus::Unsolved,
            obj_val: T::nan(),
            iterations: 0,
            solve_time: 0f64,
        }
    }

    /// Solution reported when setup or validation fails: vectors are
    /// allocated at the problem dimensions and NaN filled, so callers
    /// can consume results uniformly.
    pub fn failure(n: usize, m: usize) -> Self {
        let mut sol = Self::new(n, m);
        sol.x.set(T::nan());
        sol.y.set(T::nan());
        sol.s.set(T::nan());
        sol.status = SolverStatus::Failure;
        sol
    }

    /// Pull (x, y, s) out of the terminal iterates, classify the result
    /// if the main loop fell through without a verdict, rescale
    /// certificates, and populate the residual fields of `info`.
    pub(crate) fn post_process(
        &mut self,
        ws: &Workspace<T>,
        res: &mut Residuals<T>,
        data: &ProblemData<T>,
        info: &mut Info<T>,
        settings: &Settings<T>,
    ) {
        let (n, m, l) = (ws.n, ws.m, ws.l);

        self.x.copy_from(&ws.u[0..n]);
        self.y.copy_from(&ws.u[n..n + m]);
        self.s.copy_from(&ws.v[n..n + m]);

        // on fall-through from the main loop, classify the terminal
        // point from (τ, κ, cᵀx, bᵀy)
        if matches!(info.status, SolverStatus::Unsolved | SolverStatus::Solved) {
            let tau = ws.u[l - 1];
            let kap = T::abs(ws.v[l - 1]);

            if tau > settings.undet_tol && tau > kap {
                info.status = self.declare_solved(tau);
            } else if ws.u.norm()
                < settings.undet_tol * T::sqrt(T::from_usize(l).unwrap())
            {
                info.status = self.declare_indeterminate();
            } else {
                let bty = self.y.dot(&data.b);
                let ctx = self.x.dot(&data.c);
                info.status = if bty < ctx {
                    self.declare_infeasible()
                } else {
                    self.declare_unbounded()
                };
            }
        } else if info.status == SolverStatus::Infeasible {
            info.status = self.declare_infeasible();
        } else {
            info.status = self.declare_unbounded();
        }

        self.finalize_info(res, data, info, settings);

        self.status = info.status;
        self.obj_val = info.pobj;
        self.iterations = info.iterations;
    }

    fn declare_solved(&mut self, tau: T) -> SolverStatus {
        let scale = T::recip(tau);
        self.x.scale(scale);
        self.y.scale(scale);
        self.s.scale(scale);
        SolverStatus::Solved
    }

    fn declare_indeterminate(&mut self) -> SolverStatus {
        self.x.set(T::nan());
        self.y.set(T::nan());
        self.s.set(T::nan());
        SolverStatus::Indeterminate
    }

    fn declare_infeasible(&mut self) -> SolverStatus {
        self.x.set(T::nan());
        self.s.set(T::nan());
        SolverStatus::Infeasible
    }

    fn declare_unbounded(&mut self) -> SolverStatus {
        self.y.set(T::nan());
        SolverStatus::Unbounded
    }

    // Residuals and objectives of the terminal point, computed with
    // explicit products by A, plus the certificate rescalings.
    fn finalize_info(
        &mut self,
        res: &mut Residuals<T>,
        data: &ProblemData<T>,
        info: &mut Info<T>,
        settings: &Settings<T>,
    ) {
        let equil = &data.equilibration;

        let (nm_pri, nm_axs) =
            res.primal_residual_norms(data, settings, &self.x, &self.s, T::one());
        let (nm_dual, nm_aty) = res.dual_residual_norms(data, settings, &self.y, T::one());

        let mut ctx = self.x.dot(&data.c);
        let mut bty = self.y.dot(&data.b);
        if settings.normalize {
            let descale = equil.scale * equil.sc_c * equil.sc_b;
            ctx /= descale;
            bty /= descale;
        }

        info.pobj = ctx;
        info.dobj = -bty;

        match info.status {
            SolverStatus::Solved => {
                info.rel_gap = T::abs(ctx + bty) / (T::one() + T::abs(ctx) + T::abs(bty));
                info.res_pri = nm_pri / (T::one() + data.norm_b);
                info.res_dual = nm_dual / (T::one() + data.norm_c);
            }
            SolverStatus::Unbounded => {
                info.dobj = T::nan();
                info.rel_gap = T::nan();
                info.res_pri = data.norm_c * nm_axs / -ctx;
                info.res_dual = T::nan();
                let rescale = -T::recip(ctx);
                self.x.scale(rescale);
                self.s.scale(rescale);
                info.pobj = -T::one();
            }
            _ => {
                // infeasible and indeterminate report the dual
                // certificate fields
                info.pobj = T::nan();
                info.rel_gap = T::nan();
                info.res_pri = T::nan();
                info.res_dual = data.norm_b * nm_aty / -bty;
                let rescale = -T::recip(bty);
                self.y.scale(rescale);
                info.dobj = -T::one();
            }
        }
    }
}
