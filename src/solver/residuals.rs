#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::{ProblemData, Settings, SolverStatus, Workspace};
use itertools::izip;

// ---------------
// residuals and termination oracle
// ---------------

/// Residual snapshot taken at sampling iterations.
///
/// `res_pri` and `res_dual` carry the unboundedness / infeasibility
/// certificate values until τ > κ, after which they carry the relative
/// primal and dual residuals of the candidate solution.
pub(crate) struct Residuals<T> {
    pub res_pri: T,
    pub res_dual: T,
    pub rel_gap: T,
    pub ctx: T,
    pub bty: T,
    pub kap: T,

    // residual scratch
    pr: Vec<T>,
    dr: Vec<T>,
}

impl<T> Residuals<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        Self {
            res_pri: T::nan(),
            res_dual: T::nan(),
            rel_gap: T::nan(),
            ctx: T::nan(),
            bty: T::nan(),
            kap: T::nan(),
            pr: vec![T::zero(); m],
            dr: vec![T::zero(); n],
        }
    }

    /// Classify the current iterate.  Certificates are checked before
    /// optimality, and unboundedness before infeasibility, so the
    /// priority order is observable on pathological points.
    pub fn check_termination(
        &mut self,
        ws: &Workspace<T>,
        data: &ProblemData<T>,
        settings: &Settings<T>,
    ) -> SolverStatus {
        let (n, m, l) = (ws.n, ws.m, ws.l);
        let equil = &data.equilibration;

        let tau = T::abs(ws.u[l - 1]);
        let mut kap = T::abs(ws.v[l - 1]);
        self.kap = kap;

        let x = &ws.u[0..n];
        let y = &ws.u[n..n + m];

        // primal residual from the iterates alone, avoiding a product
        // with A:  Ax + s = u_y + (α−2)·u_prev_y + (1−α)·u_t_y + u_t_τ·b,
        // which holds because u_t is the subspace projection of u + v
        let alpha = settings.alpha;
        self.pr.copy_from(&ws.u[n..n + m]);
        self.pr
            .axpby(alpha - (2.0).as_T(), &ws.u_prev[n..n + m], T::one());
        self.pr
            .axpby(T::one() - alpha, &ws.u_t[n..n + m], T::one());
        self.pr.axpby(ws.u_t[l - 1], &data.b, T::one());

        let (nm_pri, nm_axs) = _weighted_residual_norms(
            &self.pr,
            &data.b,
            tau,
            &equil.d,
            equil.sc_b * equil.scale,
            settings.normalize,
        );

        let mut ctx = x.dot(&data.c);
        if settings.normalize {
            let descale = equil.scale * equil.sc_c * equil.sc_b;
            kap /= descale;
            ctx /= descale;
        }

        // unboundedness certificate
        self.res_pri = if ctx < T::zero() {
            data.norm_c * nm_axs / -ctx
        } else {
            T::nan()
        };
        if self.res_pri < settings.eps {
            return SolverStatus::Unbounded;
        }

        // dual residual requires the explicit product Aᵀy
        data.A.t().gemv(&mut self.dr, y, T::one(), T::zero());
        let (nm_dual, nm_aty) = _weighted_residual_norms(
            &self.dr,
            &data.c,
            -tau,
            &equil.e,
            equil.sc_c * equil.scale,
            settings.normalize,
        );

        let mut bty = y.dot(&data.b);
        if settings.normalize {
            bty /= equil.scale * equil.sc_c * equil.sc_b;
        }

        // infeasibility certificate
        self.res_dual = if bty < T::zero() {
            data.norm_b * nm_aty / -bty
        } else {
            T::nan()
        };
        if self.res_dual < settings.eps {
            return SolverStatus::Infeasible;
        }

        self.rel_gap = T::nan();

        if tau > kap {
            let rpri = nm_pri / (T::one() + data.norm_b) / tau;
            let rdua = nm_dual / (T::one() + data.norm_c) / tau;
            let gap = T::abs(ctx + bty) / (tau + T::abs(ctx) + T::abs(bty));

            self.res_pri = rpri;
            self.res_dual = rdua;
            self.rel_gap = gap;
            self.ctx = ctx / tau;
            self.bty = bty / tau;

            if T::max(T::max(rpri, rdua), gap) < settings.eps {
                return SolverStatus::Solved;
            }
        } else {
            self.ctx = T::nan();
            self.bty = T::nan();
        }

        SolverStatus::Unsolved
    }

    /// ‖Ax + s − bτ‖ and ‖Ax + s‖, weighted back to the original row
    /// units, from explicit products with A.  Used by the extractor.
    pub fn primal_residual_norms(
        &mut self,
        data: &ProblemData<T>,
        settings: &Settings<T>,
        x: &[T],
        s: &[T],
        tau: T,
    ) -> (T, T) {
        data.A.gemv(&mut self.pr, x, T::one(), T::zero());
        self.pr.axpby(T::one(), s, T::one());

        let equil = &data.equilibration;
        _weighted_residual_norms(
            &self.pr,
            &data.b,
            tau,
            &equil.d,
            equil.sc_b * equil.scale,
            settings.normalize,
        )
    }

    /// ‖Aᵀy + cτ‖ and ‖Aᵀy‖, weighted back to the original column units.
    pub fn dual_residual_norms(
        &mut self,
        data: &ProblemData<T>,
        settings: &Settings<T>,
        y: &[T],
        tau: T,
    ) -> (T, T) {
        data.A.t().gemv(&mut self.dr, y, T::one(), T::zero());

        let equil = &data.equilibration;
        _weighted_residual_norms(
            &self.dr,
            &data.c,
            -tau,
            &equil.e,
            equil.sc_c * equil.scale,
            settings.normalize,
        )
    }
}

// Given r and the shift vector t, returns (‖r − shift_scale·t‖_w, ‖r‖_w)
// with per-entry weights w_i = scales_i / sc when normalized and 1
// otherwise.
fn _weighted_residual_norms<T: FloatT>(
    r: &[T],
    shift: &[T],
    shift_scale: T,
    scales: &[T],
    sc: T,
    normalize: bool,
) -> (T, T) {
    let mut res = T::zero();
    let mut nm = T::zero();

    for (&ri, &ti, &si) in izip!(r, shift, scales) {
        let w = if normalize { si / sc } else { T::one() };
        let w2 = w * w;
        nm += ri * ri * w2;
        let shifted = ri - ti * shift_scale;
        res += shifted * shifted * w2;
    }
    (T::sqrt(res), T::sqrt(nm))
}
