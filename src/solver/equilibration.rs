#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::cones::ConeSet;
use crate::solver::Settings;
use std::iter::zip;

// ---------------
// equilibration data
// ---------------

/// Diagonal scaling data produced when the problem is normalized.
///
/// The constraint matrix is rescaled as `scale * D⁻¹ A E⁻¹` at setup, and
/// b and c are rescaled at the start of each solve.  Row scalings are
/// averaged within each cone block so that the scaled slacks stay inside
/// the same cone.  All fields are the identity when normalization is
/// disabled.
pub struct Equilibration<T> {
    /// Vector of constraint (row) scaling terms
    pub d: Vec<T>,
    /// Vector of variable (column) scaling terms
    pub e: Vec<T>,
    /// scaling applied to b
    pub sc_b: T,
    /// scaling applied to c
    pub sc_c: T,
    /// overall scaling of the problem data
    pub scale: T,

    // mean row norm of the diagonally scaled A, used to set sc_c
    mean_row_norm: T,
}

impl<T> Equilibration<T>
where
    T: FloatT,
{
    /// creates a new equilibration object with identity scalings
    pub fn new(n: usize, m: usize, scale: T) -> Self {
        Self {
            d: vec![T::one(); m],
            e: vec![T::one(); n],
            sc_b: T::one(),
            sc_c: T::one(),
            scale,
            mean_row_norm: T::one(),
        }
    }

    /// Rescale A in place as `scale * D⁻¹ A E⁻¹`, computing D from the
    /// cone-blockwise mean row norms and E from the column norms of the
    /// row-scaled matrix.
    pub(crate) fn normalize_A(
        &mut self,
        A: &mut CscMatrix<T>,
        cones: &ConeSet<T>,
        settings: &Settings<T>,
    ) {
        let (m, n) = (A.nrows(), A.ncols());
        let d = &mut self.d;
        let e = &mut self.e;

        let min_row = settings.equilibrate_min_scaling * T::sqrt(T::from_usize(n).unwrap());
        let max_row = settings.equilibrate_max_scaling * T::sqrt(T::from_usize(n).unwrap());
        let min_col = settings.equilibrate_min_scaling * T::sqrt(T::from_usize(m).unwrap());
        let max_col = settings.equilibrate_max_scaling * T::sqrt(T::from_usize(m).unwrap());

        // D : row norms averaged across each cone block, so that rows of
        // one cone are scaled uniformly
        d.fill(T::zero());
        A.row_sumsq(d);
        d.scalarop(T::sqrt);

        for rng in cones.rng_cones.iter() {
            let block_mean = d[rng.clone()].mean();
            d[rng.clone()].set(block_mean);
        }

        // rows with very small norms are left unscaled
        d.scalarop(|v| if v < min_row { T::one() } else { v });
        d.clip(T::zero(), max_row);

        let mut dinv = d.clone();
        dinv.recip();
        A.lscale(&dinv);

        // E : column norms of the row-scaled matrix
        A.col_norms(e);
        e.scalarop(|v| if v < min_col { T::one() } else { v });
        e.clip(T::zero(), max_col);

        let mut einv = e.clone();
        einv.recip();
        A.rscale(&einv);

        // mean row norm of the fully scaled matrix, for use in sc_c
        let mut row_norms = vec![T::zero(); m];
        A.row_sumsq(&mut row_norms);
        row_norms.scalarop(T::sqrt);
        self.mean_row_norm = row_norms.mean();

        A.scale(self.scale);
    }

    /// Rescale b and c in place for the scaled constraint matrix.
    pub(crate) fn normalize_bc(&mut self, b: &mut [T], c: &mut [T], min_scaling: T) {
        zip(b.iter_mut(), &self.d).for_each(|(b, &d)| *b /= d);
        self.sc_b = T::recip(T::max(b.norm(), min_scaling));
        b.scale(self.sc_b * self.scale);

        zip(c.iter_mut(), &self.e).for_each(|(c, &e)| *c /= e);
        self.sc_c = self.mean_row_norm / T::max(c.norm(), min_scaling);
        c.scale(self.sc_c * self.scale);
    }

    /// Restore b and c to their original values.
    pub(crate) fn unnormalize_bc(&self, b: &mut [T], c: &mut [T]) {
        b.scale(T::recip(self.sc_b * self.scale));
        zip(b.iter_mut(), &self.d).for_each(|(b, &d)| *b *= d);

        c.scale(T::recip(self.sc_c * self.scale));
        zip(c.iter_mut(), &self.e).for_each(|(c, &e)| *c *= e);
    }

    /// Map warm-started variables into the scaled space.
    pub(crate) fn normalize_warm_start(&self, x: &mut [T], y: &mut [T], s: &mut [T]) {
        zip(x.iter_mut(), &self.e).for_each(|(x, &e)| *x *= self.sc_b * e);
        zip(y.iter_mut(), &self.d).for_each(|(y, &d)| *y *= self.sc_c * d);
        zip(s.iter_mut(), &self.d).for_each(|(s, &d)| *s *= self.sc_b * self.scale / d);
    }

    /// Map a terminal solution back to the original units.  The identity
    /// when the scalings are the identity.
    pub(crate) fn unnormalize_sol(&self, x: &mut [T], y: &mut [T], s: &mut [T]) {
        zip(x.iter_mut(), &self.e).for_each(|(x, &e)| *x /= self.sc_b * e);
        zip(y.iter_mut(), &self.d).for_each(|(y, &d)| *y /= self.sc_c * d);
        zip(s.iter_mut(), &self.d).for_each(|(s, &d)| *s *= d / (self.sc_b * self.scale));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solver::cones::SupportedConeT;

    #[test]
    fn test_normalize_unit_norms() {
        let mut A = CscMatrix::from(&[
            [10., 0.],  //
            [0., 0.1],  //
            [4., -3.],  //
        ]);
        let cones = ConeSet::<f64>::new(&[SupportedConeT::NonnegativeConeT(3)]);
        let settings = Settings::<f64>::default();

        let mut equil = Equilibration::new(2, 3, 1.0);
        equil.normalize_A(&mut A, &cones, &settings);

        // all three rows share one cone block, so they share one scaling
        assert!(equil.d.iter().all(|&di| di == equil.d[0]));

        // column norms of the scaled matrix are unity
        let mut norms = vec![0.0; 2];
        A.col_norms(&mut norms);
        assert!((norms[0] - 1.0).abs() < 1e-12);
        assert!((norms[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_roundtrip_bc() {
        let mut equil = Equilibration::new(2, 2, 1.0);
        equil.d = vec![2.0, 4.0];
        equil.e = vec![0.5, 8.0];

        let b0 = vec![1.0, -3.0];
        let c0 = vec![2.0, 5.0];

        let mut b = b0.clone();
        let mut c = c0.clone();
        equil.normalize_bc(&mut b, &mut c, 1e-4);
        equil.unnormalize_bc(&mut b, &mut c);

        assert!(b.dist(&b0) < 1e-14);
        assert!(c.dist(&c0) < 1e-14);
    }

    #[test]
    fn test_warm_start_roundtrip() {
        let mut equil = Equilibration::new(2, 2, 5.0);
        equil.d = vec![2.0, 4.0];
        equil.e = vec![0.5, 8.0];
        equil.sc_b = 0.25;
        equil.sc_c = 3.0;

        let x0 = vec![1.0, 2.0];
        let y0 = vec![-1.0, 0.5];
        let s0 = vec![0.0, 7.0];

        let (mut x, mut y, mut s) = (x0.clone(), y0.clone(), s0.clone());
        equil.normalize_warm_start(&mut x, &mut y, &mut s);
        equil.unnormalize_sol(&mut x, &mut y, &mut s);

        assert!(x.dist(&x0) < 1e-14);
        assert!(y.dist(&y0) < 1e-14);
        assert!(s.dist(&s0) < 1e-14);
    }
}
