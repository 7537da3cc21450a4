#![allow(non_snake_case)]

use super::*;
use std::time::{Duration, Instant};

// -------------------------------------
// indirect subspace solver via conjugate gradient
// -------------------------------------

// outer iteration k asks CG for a relative tolerance of
// CG_TOL_FACTOR / (k+1)^cg_rate, floored at cg_best_tol
const CG_TOL_FACTOR: f64 = 1e-1;

// Solves M z = rhs by reducing to the positive definite system
//   (ρI + AᵀA) x = r_x + Aᵀ r_y,    y = A x − r_y
// and applying Jacobi-preconditioned conjugate gradient to the x block.
pub(crate) struct IndirectCgSolver<T> {
    // inverse diagonal of ρI + AᵀA
    Minv: Vec<T>,

    rho_x: T,
    rate: T,
    best_tol: T,

    // CG work vectors of the column dimension ...
    q: Vec<T>,
    x: Vec<T>,
    r: Vec<T>,
    z: Vec<T>,
    p: Vec<T>,
    Mp: Vec<T>,
    // ... and one of the row dimension for products A*p
    w: Vec<T>,

    //cumulative solve statistics
    nsolves: usize,
    cg_iters: usize,
    solve_time: Duration,
}

impl<T> IndirectCgSolver<T>
where
    T: FloatT,
{
    pub fn new(A: &CscMatrix<T>, rho_x: T, rate: T, best_tol: T) -> Self {
        let (m, n) = (A.nrows(), A.ncols());

        let mut Minv = vec![T::zero(); n];
        A.col_norms(&mut Minv);
        Minv.scalarop(|v| T::recip(rho_x + v * v));

        Self {
            Minv,
            rho_x,
            rate,
            best_tol,
            q: vec![T::zero(); n],
            x: vec![T::zero(); n],
            r: vec![T::zero(); n],
            z: vec![T::zero(); n],
            p: vec![T::zero(); n],
            Mp: vec![T::zero(); n],
            w: vec![T::zero(); m],
            nsolves: 0,
            cg_iters: 0,
            solve_time: Duration::ZERO,
        }
    }
}

impl<T> LinearSolver<T> for IndirectCgSolver<T>
where
    T: FloatT,
{
    fn method(&self) -> String {
        "indirect / conjugate gradient, Jacobi preconditioned".to_string()
    }

    fn solve(&mut self, A: &CscMatrix<T>, rhs: &mut [T], warm: Option<&[T]>, iter: Option<u32>) {
        let start = Instant::now();
        let n = A.ncols();
        let (rx, ry) = rhs.split_at_mut(n);

        // reduced right hand side q = r_x + Aᵀ r_y
        self.q.copy_from(rx);
        A.t().gemv(&mut self.q, ry, T::one(), T::one());

        match warm {
            Some(warm) => {
                self.x.copy_from(&warm[0..n]);
            }
            None => self.x.fill(T::zero()),
        }

        // tolerance tightens as the outer iteration proceeds; setup
        // solves go straight to the best achievable tolerance
        let factor = match iter {
            None => self.best_tol,
            Some(i) => {
                let k: T = T::from_u32(i + 1).unwrap();
                T::max(
                    self.best_tol,
                    <f64 as crate::algebra::AsFloatT<T>>::as_T(&CG_TOL_FACTOR)
                        / T::powf(k, self.rate),
                )
            }
        };
        let tol = self.q.norm() * factor;

        self.cg_iters += _pcg(
            A,
            self.rho_x,
            &mut self.x,
            &self.q,
            &self.Minv,
            &mut self.r,
            &mut self.z,
            &mut self.p,
            &mut self.Mp,
            &mut self.w,
            tol,
            n.max(20),
        );

        // recover the y block:  y = A x − r_y
        A.gemv(ry, &self.x, T::one(), -T::one());
        rx.copy_from(&self.x);

        self.solve_time += start.elapsed();
        self.nsolves += 1;
    }

    fn summary(&mut self) -> Option<String> {
        if self.nsolves == 0 {
            return None;
        }
        let avg_time = self.solve_time.as_secs_f64() / (self.nsolves as f64);
        let avg_iters = (self.cg_iters as f64) / (self.nsolves as f64);
        self.nsolves = 0;
        self.cg_iters = 0;
        self.solve_time = Duration::ZERO;
        Some(format!(
            "Average CG iterations: {:.2}, average linear solve time: {:.2e} seconds",
            avg_iters, avg_time
        ))
    }
}

// out = (ρI + AᵀA) p, using w as row-dimension scratch
fn _apply<T: FloatT>(A: &CscMatrix<T>, rho_x: T, out: &mut [T], p: &[T], w: &mut [T]) {
    A.gemv(w, p, T::one(), T::zero());
    out.copy_from(p);
    out.scale(rho_x);
    A.t().gemv(out, w, T::one(), T::one());
}

// Jacobi-preconditioned conjugate gradient on (ρI + AᵀA)x = q, with x
// the initial guess on entry and the solution on exit.  Returns the
// number of iterations taken.
#[allow(clippy::too_many_arguments)]
fn _pcg<T: FloatT>(
    A: &CscMatrix<T>,
    rho_x: T,
    x: &mut [T],
    q: &[T],
    Minv: &[T],
    r: &mut [T],
    z: &mut [T],
    p: &mut [T],
    Mp: &mut [T],
    w: &mut [T],
    tol: T,
    max_iters: usize,
) -> usize {
    // r = q - Op(x)
    _apply(A, rho_x, r, x, w);
    r.negate();
    r.axpby(T::one(), q, T::one());

    z.copy_from(r);
    z.hadamard(Minv);
    p.copy_from(z);
    let mut rz = r.dot(z);

    for k in 0..max_iters {
        if r.norm() <= tol {
            return k;
        }

        _apply(A, rho_x, Mp, p, w);

        let alpha = rz / p.dot(Mp);
        x.axpby(alpha, p, T::one());
        r.axpby(-alpha, Mp, T::one());

        z.copy_from(r);
        z.hadamard(Minv);

        let rz_new = r.dot(z);
        let beta = rz_new / rz;
        p.axpby(T::one(), z, beta);
        rz = rz_new;
    }
    max_iters
}

#[cfg(test)]
mod test {
    use super::*;
    use std::iter::zip;

    #[test]
    fn test_indirect_solve() {
        let A: CscMatrix<f64> = CscMatrix::from(&[
            [1., 0.], //
            [0., 1.], //
            [1., 1.], //
        ]);
        let mut solver = IndirectCgSolver::new(&A, 1.0, 2.0, 1e-12);

        // M = [I A'; A -I] applied to z = [1, 2, 1, 1, 1]
        let mut rhs = vec![3., 4., 0., 1., 2.];
        solver.solve(&A, &mut rhs, None, None);

        let ztrue = [1., 2., 1., 1., 1.];
        for (zi, zt) in zip(&rhs, &ztrue) {
            assert!((zi - zt).abs() < 1e-8);
        }
    }

    #[test]
    fn test_pcg_converges_from_warm_start() {
        let A: CscMatrix<f64> = CscMatrix::from(&[
            [2., 1.], //
            [1., 3.], //
        ]);
        let mut solver = IndirectCgSolver::new(&A, 0.5, 2.0, 1e-12);

        let mut rhs = vec![1., -1., 0., 0.];
        let warm = vec![0.1, -0.1, 0., 0., 0.];
        solver.solve(&A, &mut rhs, Some(&warm), Some(5));

        // residual check on the recovered block solution
        let (x, y) = rhs.split_at(2);
        // x part: 0.5*x + A'y = 1, -1
        let resx0 = 0.5 * x[0] + 2. * y[0] + 1. * y[1] - 1.;
        let resx1 = 0.5 * x[1] + 1. * y[0] + 3. * y[1] + 1.;
        assert!(resx0.abs() < 1e-6);
        assert!(resx1.abs() < 1e-6);
    }
}
