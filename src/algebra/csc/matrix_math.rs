use crate::algebra::*;
use std::iter::zip;

impl<T: FloatT> MatrixVectorMultiply<T> for CscMatrix<T> {
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_N(self, y, x, a, b);
    }
}

impl<T: FloatT> MatrixVectorMultiply<T> for Adjoint<'_, CscMatrix<T>> {
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        _csc_axpby_T(self.src, y, x, a, b);
    }
}

impl<T: FloatT> MatrixMath<T> for CscMatrix<T> {
    fn scale(&mut self, c: T) {
        self.nzval.scale(c);
    }

    fn lscale(&mut self, l: &[T]) {
        for (val, row) in zip(&mut self.nzval, &self.rowval) {
            *val *= l[*row];
        }
    }

    fn rscale(&mut self, r: &[T]) {
        let colptr = &self.colptr;
        let vals = &mut self.nzval;

        assert_eq!(vals.len(), *colptr.last().unwrap());
        for i in 0..self.n {
            vals[colptr[i]..colptr[i + 1]].scale(r[i]);
        }
    }

    fn row_sumsq(&self, sumsq: &mut [T]) {
        assert_eq!(sumsq.len(), self.m);

        for (row, val) in zip(&self.rowval, &self.nzval) {
            sumsq[*row] += (*val) * (*val);
        }
    }

    fn col_norms(&self, norms: &mut [T]) {
        assert_eq!(norms.len(), self.n);

        for (i, v) in norms.iter_mut().enumerate() {
            *v = self.nzval[self.colptr[i]..self.colptr[i + 1]].norm();
        }
    }
}

// sparse matrix-vector multiply, no transpose
#[allow(non_snake_case)]
fn _csc_axpby_N<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    //first do the b*y part
    if b == T::zero() {
        y.fill(T::zero());
    } else if b == T::one() {
    } else if b == -T::one() {
        y.negate();
    } else {
        y.scale(b);
    }

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    assert_eq!(A.nzval.len(), *A.colptr.last().unwrap());
    assert_eq!(x.len(), A.n);

    //y += a*A*x
    if a == T::one() {
        for (j, xj) in x.iter().enumerate().take(A.n) {
            for i in A.colptr[j]..A.colptr[j + 1] {
                y[A.rowval[i]] += A.nzval[i] * *xj;
            }
        }
    } else if a == -T::one() {
        for (j, xj) in x.iter().enumerate().take(A.n) {
            for i in A.colptr[j]..A.colptr[j + 1] {
                y[A.rowval[i]] -= A.nzval[i] * *xj;
            }
        }
    } else {
        for (j, xj) in x.iter().enumerate().take(A.n) {
            for i in A.colptr[j]..A.colptr[j + 1] {
                y[A.rowval[i]] += a * A.nzval[i] * *xj;
            }
        }
    }
}

// sparse matrix-vector multiply, transposed
#[allow(non_snake_case)]
fn _csc_axpby_T<T: FloatT>(A: &CscMatrix<T>, y: &mut [T], x: &[T], a: T, b: T) {
    //first do the b*y part
    if b == T::zero() {
        y.fill(T::zero());
    } else if b == T::one() {
    } else if b == -T::one() {
        y.negate();
    } else {
        y.scale(b);
    }

    // if a is zero, we're done
    if a == T::zero() {
        return;
    }

    assert_eq!(A.nzval.len(), *A.colptr.last().unwrap());
    assert_eq!(x.len(), A.m);

    //y += a*A'*x
    if a == T::one() {
        for (j, yj) in y.iter_mut().enumerate().take(A.n) {
            for k in A.colptr[j]..A.colptr[j + 1] {
                *yj += A.nzval[k] * x[A.rowval[k]];
            }
        }
    } else if a == -T::one() {
        for (j, yj) in y.iter_mut().enumerate().take(A.n) {
            for k in A.colptr[j]..A.colptr[j + 1] {
                *yj -= A.nzval[k] * x[A.rowval[k]];
            }
        }
    } else {
        for (j, yj) in y.iter_mut().enumerate().take(A.n) {
            for k in A.colptr[j]..A.colptr[j + 1] {
                *yj += a * A.nzval[k] * x[A.rowval[k]];
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[allow(non_snake_case)]
    fn test_matrix() -> CscMatrix<f64> {
        CscMatrix::from(&[
            [1., 0., 3.], //
            [2., 4., 0.], //
        ])
    }

    #[test]
    fn test_gemv() {
        let A = test_matrix();
        let x = vec![1., 2., 3.];

        let mut y = vec![1., 1.];
        A.gemv(&mut y, &x, 2., -1.);
        assert_eq!(y, vec![19., 19.]);
    }

    #[test]
    fn test_gemv_transpose() {
        let A = test_matrix();
        let x = vec![1., 2.];

        let mut y = vec![0.; 3];
        A.t().gemv(&mut y, &x, 1., 0.);
        assert_eq!(y, vec![5., 8., 3.]);
    }

    #[test]
    fn test_diagonal_scalings() {
        let mut A = test_matrix();
        A.lscale(&[2., 3.]);
        A.rscale(&[1., 1., 10.]);
        // A = [2 0 60; 6 12 0]
        assert_eq!(A.nzval, vec![2., 6., 12., 60.]);

        let mut sumsq = vec![0.; 2];
        A.row_sumsq(&mut sumsq);
        assert_eq!(sumsq, vec![4. + 3600., 36. + 144.]);

        let mut norms = vec![0.; 3];
        A.col_norms(&mut norms);
        assert_eq!(norms[1], 12.);
    }
}
