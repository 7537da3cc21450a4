#![allow(non_snake_case)]

use crate::algebra::{Adjoint, FloatT, SparseFormatError};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use splitcone::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
///
/// ```

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// This field should have length `n+1`. The last entry corresponds
    /// to the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__ ensure that row indices
    /// are all in bounds or that data is arranged such that entries within
    /// each column appear in order of increasing row index.   Responsibility
    /// for ensuring these conditions hold is left to the caller, or can be
    /// checked after the fact with
    /// [`check_format`](crate::algebra::CscMatrix::check_format).

    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for an m x n matrix with `nnz` structural nonzeros.
    /// All column pointers but the last are zero, i.e. the nonzeros are
    /// not yet assigned to columns.
    pub fn spalloc(m: usize, n: usize, nnz: usize) -> Self {
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// number of rows
    pub fn nrows(&self) -> usize {
        self.m
    }

    /// number of columns
    pub fn ncols(&self) -> usize {
        self.n
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// true if the matrix is square
    pub fn is_square(&self) -> bool {
        self.m == self.n
    }

    /// transpose view
    pub fn t(&self) -> Adjoint<'_, Self> {
        Adjoint { src: self }
    }

    /// true if all entries sit on or above the diagonal
    pub fn is_triu(&self) -> bool {
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].iter().any(|&row| row > col) {
                return false;
            }
        }
        true
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }

        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }
}

/// Construct a `CscMatrix` from a dense row-major array of arrays.
/// Intended for small examples and unit tests.
impl<T, const R: usize, const C: usize> From<&[[T; C]; R]> for CscMatrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; C]; R]) -> Self {
        let mut colptr = Vec::with_capacity(C + 1);
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();

        colptr.push(0);
        for col in 0..C {
            for (row, vals) in rows.iter().enumerate() {
                if vals[col] != T::zero() {
                    rowval.push(row);
                    nzval.push(vals[col]);
                }
            }
            colptr.push(rowval.len());
        }

        CscMatrix::new(R, C, colptr, rowval, nzval)
    }
}

#[test]
fn test_check_format() {
    let mut A = CscMatrix::from(&[
        [1., 3., 5.], //
        [2., 0., 6.], //
        [0., 4., 7.], //
    ]);
    assert_eq!(A.colptr, vec![0, 2, 4, 7]);
    assert_eq!(A.rowval, vec![0, 1, 0, 2, 0, 1, 2]);
    assert!(A.check_format().is_ok());

    // out of bounds row index
    A.rowval[2] = 3;
    assert!(matches!(
        A.check_format(),
        Err(SparseFormatError::BadRowval)
    ));

    // unordered rows within a column
    A.rowval[2] = 2;
    A.rowval[3] = 1;
    assert!(matches!(
        A.check_format(),
        Err(SparseFormatError::BadRowOrdering)
    ));

    // broken column pointers
    A.colptr[1] = 5;
    assert!(matches!(A.check_format(), Err(SparseFormatError::BadColptr)));
}

#[test]
fn test_identity_and_triu() {
    let I: CscMatrix<f64> = CscMatrix::identity(3);
    assert_eq!(I.nnz(), 3);
    assert!(I.is_triu());

    let A = CscMatrix::from(&[
        [1., 1.], //
        [1., 1.], //
    ]);
    assert!(!A.is_triu());
}
