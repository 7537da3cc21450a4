#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::cones::ConeSet;
use crate::solver::linsys::LinearSolver;
use crate::solver::{ProblemData, Settings, Solution};
use itertools::izip;

// ---------------
// iteration workspace
// ---------------

// Variables of the homogeneous self-dual embedding.  With ℓ = n + m + 1,
// u = (x, y, τ) and v carries the same partition with (·, s, κ); the dual
// update leaves the leading x block of v untouched at zero.
pub(crate) struct Workspace<T> {
    pub u: Vec<T>,
    pub v: Vec<T>,
    pub u_t: Vec<T>,
    pub u_prev: Vec<T>,

    // fixed right hand sides of the subspace projection: h = (c; b) and
    // g = M⁻¹h with its y block negated, both computed once per solve
    pub h: Vec<T>,
    pub g: Vec<T>,
    pub gth: T,

    pub n: usize,
    pub m: usize,
    pub l: usize,
}

impl<T> Workspace<T>
where
    T: FloatT,
{
    pub fn new(n: usize, m: usize) -> Self {
        let l = n + m + 1;
        Self {
            u: vec![T::zero(); l],
            v: vec![T::zero(); l],
            u_t: vec![T::zero(); l],
            u_prev: vec![T::zero(); l],
            h: vec![T::zero(); l - 1],
            g: vec![T::zero(); l - 1],
            gth: T::zero(),
            n,
            m,
            l,
        }
    }

    pub fn cold_start(&mut self) {
        self.u.fill(T::zero());
        self.v.fill(T::zero());
        let sqrt_l = T::sqrt(T::from_usize(self.l).unwrap());
        self.u[self.l - 1] = sqrt_l;
        self.v[self.l - 1] = sqrt_l;
    }

    pub fn warm_start(&mut self, sol: &Solution<T>, data: &ProblemData<T>, settings: &Settings<T>) {
        let (n, m, l) = (self.n, self.m, self.l);

        self.u[0..n].copy_from(&sol.x);
        self.u[n..n + m].copy_from(&sol.y);
        self.v[0..n].fill(T::zero());
        self.v[n..n + m].copy_from(&sol.s);
        self.u[l - 1] = T::one();
        self.v[l - 1] = T::zero();

        if settings.normalize {
            let (x, yτ) = self.u.split_at_mut(n);
            let (s, _) = self.v[n..].split_at_mut(m);
            data.equilibration
                .normalize_warm_start(x, &mut yτ[0..m], s);
        }
    }

    // Compute h, g and gᵀh for the rank-one correction of the subspace
    // projection.  These stay fixed until the next solve.
    pub fn prepare(&mut self, data: &ProblemData<T>, linsys: &mut Box<dyn LinearSolver<T>>) {
        let (n, m) = (self.n, self.m);

        self.h[0..n].copy_from(&data.c);
        self.h[n..n + m].copy_from(&data.b);

        self.g.copy_from(&self.h);
        linsys.solve(&data.A, &mut self.g, None, None);
        self.g[n..n + m].negate();

        self.gth = self.h.dot(&self.g);
    }

    /// Project u + v onto the affine subspace of the embedding, writing
    /// the result to u_t.  The quasidefinite solve handles the (x, y)
    /// blocks; the rank-one correction in (g, h) handles τ analytically.
    pub fn project_linear(
        &mut self,
        data: &ProblemData<T>,
        linsys: &mut Box<dyn LinearSolver<T>>,
        settings: &Settings<T>,
        iter: u32,
    ) {
        let (n, m, l) = (self.n, self.m, self.l);

        // u_t = u + v, with the x block scaled by ρ
        self.u_t.copy_from(&self.u);
        self.u_t.axpby(T::one(), &self.v, T::one());
        self.u_t[0..n].scale(settings.rho_x);

        let wτ = self.u_t[l - 1];
        self.u_t[0..l - 1].axpby(-wτ, &self.h, T::one());

        let correction = self.u_t[0..l - 1].dot(&self.g) / (self.gth + T::one());
        self.u_t[0..l - 1].axpby(-correction, &self.h, T::one());

        self.u_t[n..n + m].negate();

        linsys.solve(&data.A, &mut self.u_t[0..n + m], Some(&self.u), Some(iter));

        // τ component: the slot still holds w[ℓ-1] here
        let dot = self.u_t[0..l - 1].dot(&self.h);
        self.u_t[l - 1] += dot;
    }

    /// Over-relaxed intermediate point, projected onto the domain: the x
    /// block is free, the y block is projected onto 𝒦*, and τ is clamped
    /// at zero.
    pub fn project_cones(&mut self, cones: &ConeSet<T>, settings: &Settings<T>) {
        let (n, m, l) = (self.n, self.m, self.l);
        let alpha = settings.alpha;

        // the x block is not relaxed
        for (u, &ut, &v) in izip!(&mut self.u[0..n], &self.u_t[0..n], &self.v[0..n]) {
            *u = ut - v;
        }

        for i in n..l {
            self.u[i] =
                alpha * self.u_t[i] + (T::one() - alpha) * self.u_prev[i] - self.v[i];
        }

        cones.project_duals(&mut self.u[n..n + m]);

        if self.u[l - 1] < T::zero() {
            self.u[l - 1] = T::zero();
        }
    }

    /// Dual ascent step on the y and τ blocks.
    pub fn update_dual(&mut self, settings: &Settings<T>) {
        let (n, l) = (self.n, self.l);
        let alpha = settings.alpha;

        if T::abs(alpha - T::one()) < (1e-9).as_T() {
            let sig = T::one();
            for i in n..l {
                self.v[i] += sig * (self.u[i] - self.u_t[i]);
            }
        } else {
            // the x block of v is not relaxed
            for i in n..l {
                self.v[i] +=
                    self.u[i] - alpha * self.u_t[i] - (T::one() - alpha) * self.u_prev[i];
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cold_start() {
        let mut ws = Workspace::<f64>::new(2, 3);
        ws.cold_start();

        assert_eq!(ws.l, 6);
        assert_eq!(ws.u[5], f64::sqrt(6.));
        assert_eq!(ws.v[5], f64::sqrt(6.));
        assert!(ws.u[0..5].iter().all(|&ui| ui == 0.));
    }

    #[test]
    fn test_update_dual_alpha_one() {
        let mut ws = Workspace::<f64>::new(1, 1);
        ws.u = vec![5., 2., 1.];
        ws.u_t = vec![4., 1., 3.];
        ws.v = vec![1., 1., 1.];

        let mut settings = Settings::<f64>::default();
        settings.alpha = 1.0;
        ws.update_dual(&settings);

        // x block untouched, y and τ blocks relaxed with σ = 1
        assert_eq!(ws.v, vec![1., 2., -1.]);
    }
}
