#![allow(non_snake_case)]

use crate::algebra::*;
use std::iter::zip;
use thiserror::Error;

/// Error type returned by the quasidefinite LDLᵀ factorization.
#[derive(Error, Debug)]
pub enum LdlError {
    #[error("matrix must be square, upper triangular, with a full structural diagonal")]
    BadStructure,
    #[error("fill-reducing ordering failed")]
    Ordering,
    #[error("factorization produced a zero pivot")]
    ZeroPivot,
}

// near-zero pivots are pushed away from zero without changing sign,
// which keeps the factorization alive when rho_x = 0
const REGULARIZE_EPS: f64 = 1e-12;
const REGULARIZE_DELTA: f64 = 1e-7;

const UNKNOWN: usize = usize::MAX;

/// LDLᵀ factors of a sparse symmetric quasidefinite matrix.
///
/// The input is the upper triangle in CSC form with every diagonal entry
/// structurally present.  The expected signs of the diagonal D are fixed
/// by the caller, so no pivoting is performed; near-zero pivots are
/// regularized in a sign-preserving way instead.
pub(crate) struct LdlFactorization<T = f64> {
    // fill reducing permutation (maps permuted index -> original index)
    perm: Vec<usize>,
    // lower triangular factor
    L: CscMatrix<T>,
    // inverse of the diagonal D in K = LDLᵀ
    Dinv: Vec<T>,
    // permuted right hand side workspace
    fwork: Vec<T>,
    // number of positive entries in D
    pub(crate) positive_inertia: usize,
}

impl<T> LdlFactorization<T>
where
    T: FloatT,
{
    pub fn new(K: &CscMatrix<T>, dsigns: &[i8]) -> Result<Self, LdlError> {
        let n = K.nrows();
        assert_eq!(dsigns.len(), n);
        _check_structure(K)?;

        // AMD fill-reducing ordering and symmetric permutation
        let control = amd::Control::default();
        let (perm, iperm, _info) =
            amd::order(n, &K.colptr, &K.rowval, &control).map_err(|_| LdlError::Ordering)?;
        let pK = _permute_symmetric(K, &iperm);

        // permute the expected pivot signs to match
        let mut psigns = vec![1_i8; n];
        zip(&mut psigns, &perm).for_each(|(s, &p)| *s = dsigns[p]);

        // elimination tree and column counts of L
        let (etree, Lnz) = _etree(n, &pK.colptr, &pK.rowval);
        let Lnnz = Lnz.iter().sum();

        let mut L = CscMatrix::spalloc(n, n, Lnnz);
        let mut Dinv = vec![T::zero(); n];
        let fwork = vec![T::zero(); n];

        let positive_inertia = _factor(&pK, &mut L, &mut Dinv, &etree, &Lnz, &psigns)?;

        Ok(Self {
            perm,
            L,
            Dinv,
            fwork,
            positive_inertia,
        })
    }

    /// Solves Kx = b in place using the cached factors.
    pub fn solve(&mut self, b: &mut [T]) {
        assert_eq!(b.len(), self.Dinv.len());

        // permute, then (L+I) \ b,  D \ b,  (L+I)ᵀ \ b, then un-permute
        let x = &mut self.fwork;
        zip(x.iter_mut(), &self.perm).for_each(|(x, &p)| *x = b[p]);

        _lsolve(&self.L, x);
        x.hadamard(&self.Dinv);
        _ltsolve(&self.L, x);

        zip(&self.perm, x.iter()).for_each(|(&p, x)| b[p] = *x);
    }

    /// number of nonzeros in the factor L
    pub fn nnz(&self) -> usize {
        self.L.nnz()
    }
}

fn _check_structure<T: FloatT>(K: &CscMatrix<T>) -> Result<(), LdlError> {
    if !K.is_square() || !K.is_triu() {
        return Err(LdlError::BadStructure);
    }

    // triu storage means the diagonal entry, if present, is last in its
    // column.  Every column must carry one.
    for col in 0..K.ncols() {
        let rng = K.colptr[col]..K.colptr[col + 1];
        if rng.is_empty() || K.rowval[rng.end - 1] != col {
            return Err(LdlError::BadStructure);
        }
    }
    Ok(())
}

// Compute the elimination tree of a quasidefinite matrix given in upper
// triangular CSC form, along with the nonzero count of each column of L.
fn _etree(n: usize, Kp: &[usize], Ki: &[usize], ) -> (Vec<usize>, Vec<usize>) {
    let mut etree = vec![UNKNOWN; n];
    let mut Lnz = vec![0usize; n];
    let mut visited = vec![0usize; n];

    for j in 0..n {
        visited[j] = j;
        for &istart in &Ki[Kp[j]..Kp[j + 1]] {
            let mut i = istart;
            while visited[i] != j {
                if etree[i] == UNKNOWN {
                    etree[i] = j;
                }
                Lnz[i] += 1;
                visited[i] = j;
                i = etree[i];
            }
        }
    }
    (etree, Lnz)
}

// Numerical factorization K = LDLᵀ following the elimination tree.  For
// each row k of L we solve y = L(0:k-1,0:k-1) \ b with b the strictly
// upper part of column k of K, scattering along the paths of the tree.
fn _factor<T: FloatT>(
    K: &CscMatrix<T>,
    L: &mut CscMatrix<T>,
    Dinv: &mut [T],
    etree: &[usize],
    Lnz: &[usize],
    dsigns: &[i8],
) -> Result<usize, LdlError> {
    let n = K.ncols();
    let (Kp, Ki, Kx) = (&K.colptr, &K.rowval, &K.nzval);

    let eps: T = REGULARIZE_EPS.as_T();
    let delta: T = REGULARIZE_DELTA.as_T();

    let mut positive_inertia = 0;

    // scatter workspace for the current row of L
    let mut yvals = vec![T::zero(); n];
    let mut ymarkers = vec![false; n];
    let mut yidx = vec![0usize; n];
    let mut elim_path = vec![0usize; n];

    // set L.colptr to cumsum(Lnz) starting from zero, and track the next
    // free entry in each column as the factorization proceeds
    L.colptr[0] = 0;
    for i in 0..n {
        L.colptr[i + 1] = L.colptr[i] + Lnz[i];
    }
    let mut next_space: Vec<usize> = L.colptr[0..n].to_vec();

    let mut D = vec![T::zero(); n];

    // first pivot needs no elimination
    D[0] = Kx[Kp[1] - 1];
    _regularize(&mut D[0], dsigns[0], eps, delta);
    if D[0] == T::zero() {
        return Err(LdlError::ZeroPivot);
    }
    if D[0] > T::zero() {
        positive_inertia += 1;
    }
    Dinv[0] = T::recip(D[0]);

    for k in 1..n {
        // number of nonzeros in row k of L
        let mut nnz_y = 0;

        // mark the nonzero pattern by walking the elimination tree from
        // each entry of the sparse right hand side
        for idx in Kp[k]..Kp[k + 1] {
            let bidx = Ki[idx];

            if bidx == k {
                // diagonal entry seeds D[k] and takes no part in the
                // elimination of row k
                D[k] = Kx[idx];
                continue;
            }

            yvals[bidx] = Kx[idx];

            if ymarkers[bidx] {
                continue;
            }
            ymarkers[bidx] = true;
            elim_path[0] = bidx;
            let mut path_len = 1;

            let mut next = etree[bidx];
            while next != UNKNOWN && next < k {
                if ymarkers[next] {
                    break;
                }
                ymarkers[next] = true;
                elim_path[path_len] = next;
                path_len += 1;
                next = etree[next];
            }

            // record the buffered path in reverse, so that yidx ends up
            // ordered from the leaves of the tree back to the root
            while path_len != 0 {
                path_len -= 1;
                yidx[nnz_y] = elim_path[path_len];
                nnz_y += 1;
            }
        }

        // eliminate and place the row values
        for i in (0..nnz_y).rev() {
            let cidx = yidx[i];
            let yval = yvals[cidx];

            let (first, last) = (L.colptr[cidx], next_space[cidx]);
            for j in first..last {
                yvals[L.rowval[j]] -= L.nzval[j] * yval;
            }

            let lpos = next_space[cidx];
            L.nzval[lpos] = yval * Dinv[cidx];
            L.rowval[lpos] = k;
            next_space[cidx] += 1;

            D[k] -= yval * L.nzval[lpos];

            // reset the scatter workspace for the next row
            yvals[cidx] = T::zero();
            ymarkers[cidx] = false;
        }

        _regularize(&mut D[k], dsigns[k], eps, delta);
        if D[k] == T::zero() {
            return Err(LdlError::ZeroPivot);
        }
        if D[k] > T::zero() {
            positive_inertia += 1;
        }
        Dinv[k] = T::recip(D[k]);
    }

    Ok(positive_inertia)
}

#[inline]
fn _regularize<T: FloatT>(d: &mut T, sign: i8, eps: T, delta: T) {
    let sign: T = T::from_i8(sign).unwrap();
    if (*d) * sign < eps {
        *d = delta * sign;
    }
}

// Solves (L+I)x = b in place
fn _lsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for i in 0..x.len() {
        let xi = x[i];
        if xi == T::zero() {
            continue;
        }
        for j in L.colptr[i]..L.colptr[i + 1] {
            x[L.rowval[j]] -= L.nzval[j] * xi;
        }
    }
}

// Solves (L+I)ᵀx = b in place
fn _ltsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for i in (0..x.len()).rev() {
        let mut s = T::zero();
        for j in L.colptr[i]..L.colptr[i + 1] {
            s += L.nzval[j] * x[L.rowval[j]];
        }
        x[i] -= s;
    }
}

// Symmetrically permute an upper triangular matrix, producing another
// upper triangular matrix.  `iperm` maps original to permuted indices.
// Follows the scheme in Timothy Davis, "Direct Methods for Sparse Linear
// Systems".  Row indices within the permuted columns are unordered, which
// the factorization tolerates.
fn _permute_symmetric<T: FloatT>(K: &CscMatrix<T>, iperm: &[usize]) -> CscMatrix<T> {
    let n = K.ncols();
    let mut P = CscMatrix::<T>::spalloc(n, n, K.nnz());

    // count entries landing in each permuted column
    let mut counts = vec![0usize; n];
    for col in 0..n {
        let colP = iperm[col];
        for &row in &K.rowval[K.colptr[col]..K.colptr[col + 1]] {
            let rowP = iperm[row];
            counts[usize::max(rowP, colP)] += 1;
        }
    }

    // build the permuted column pointers
    P.colptr[0] = 0;
    for i in 0..n {
        P.colptr[i + 1] = P.colptr[i] + counts[i];
    }

    // reuse the counts as the next free slot in each column
    counts.copy_from_slice(&P.colptr[0..n]);

    for col in 0..n {
        let colP = iperm[col];
        for idx in K.colptr[col]..K.colptr[col + 1] {
            let rowP = iperm[K.rowval[idx]];
            let dest_col = usize::max(rowP, colP);
            let dest = counts[dest_col];
            P.rowval[dest] = usize::min(rowP, colP);
            P.nzval[dest] = K.nzval[idx];
            counts[dest_col] += 1;
        }
    }
    P
}

#[cfg(test)]
mod test {
    use super::*;

    // upper triangle of the quasidefinite matrix
    //  [ 2  0  1 ]
    //  [ 0  3  1 ]
    //  [ 1  1 -1 ]
    fn test_matrix() -> CscMatrix<f64> {
        CscMatrix::new(
            3,
            3,
            vec![0, 1, 2, 5],
            vec![0, 1, 0, 1, 2],
            vec![2., 3., 1., 1., -1.],
        )
    }

    #[test]
    fn test_factor_and_solve() {
        let K = test_matrix();
        let dsigns = [1, 1, -1];
        let mut fact = LdlFactorization::new(&K, &dsigns).unwrap();

        assert_eq!(fact.positive_inertia, 2);

        // K * [1, 2, 3]' = [5, 9, 0]'
        let mut b = vec![5., 9., 0.];
        fact.solve(&mut b);

        let xtrue = [1., 2., 3.];
        for (xi, xt) in zip(&b, &xtrue) {
            assert!((xi - xt).abs() < 1e-12);
        }
    }

    #[test]
    fn test_solve_repeated() {
        // factors are reusable across right hand sides
        let K = test_matrix();
        let mut fact = LdlFactorization::new(&K, &[1, 1, -1]).unwrap();

        let mut b1 = vec![2., 0., 1.]; //first column of K
        fact.solve(&mut b1);
        let mut b2 = vec![0., 3., 1.]; //second column of K
        fact.solve(&mut b2);

        for (i, (x1, x2)) in zip(&b1, &b2).enumerate() {
            let e1 = if i == 0 { 1.0 } else { 0.0 };
            let e2 = if i == 1 { 1.0 } else { 0.0 };
            assert!((x1 - e1).abs() < 1e-12);
            assert!((x2 - e2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_bad_structure() {
        // missing diagonal in column 1
        let K = CscMatrix::new(2, 2, vec![0, 1, 1], vec![0], vec![1.]);
        assert!(matches!(
            LdlFactorization::new(&K, &[1, -1]),
            Err(LdlError::BadStructure)
        ));
    }
}
