#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::cones::ConeSet;
use crate::solver::{Equilibration, Settings, SettingsError};
use thiserror::Error;

/// Error type returned when problem data fails validation.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("m and n must both be greater than zero")]
    EmptyProblem,
    #[error("m must be greater than or equal to n")]
    FewerRowsThanCols,
    #[error("b or c dimensions are incompatible with A")]
    IncompatibleDimension,
    #[error("column pointers of A must be strictly increasing")]
    EmptyColumn,
    #[error("nonzero count of A is outside of the valid range")]
    BadNonzeroCount,
    #[error("bad sparse matrix format: {0}")]
    BadFormat(#[from] SparseFormatError),
    #[error("cone dimensions sum to {cones}, but A has {rows} rows")]
    ConeDimensionMismatch { cones: usize, rows: usize },
    #[error("invalid settings: {0}")]
    BadSettings(#[from] SettingsError),
}

// ---------------
// problem data
// ---------------

/// Validated problem data, owned by the solver.
///
/// The fields hold an internal copy of the user's data.  When the problem
/// is normalized, A carries its equilibrated values for the lifetime of
/// the solver, while b and c are rescaled at the start of each solve and
/// restored afterwards.
pub struct ProblemData<T> {
    /// The matrix A in the constraints
    pub A: CscMatrix<T>,
    /// The vector b in the constraints
    pub b: Vec<T>,
    /// The vector c in the objective
    pub c: Vec<T>,
    /// Number of variables
    pub n: usize,
    /// Number of constraints
    pub m: usize,
    /// Equilibration data for the problem
    pub equilibration: Equilibration<T>,

    // norms of the original b and c, refreshed at the start of
    // every solve before normalization is applied
    pub(crate) norm_b: T,
    pub(crate) norm_c: T,
}

impl<T> ProblemData<T>
where
    T: FloatT,
{
    /// Validate the user's data and build an internal, possibly
    /// equilibrated, copy of it.
    pub fn new(
        A: &CscMatrix<T>,
        b: &[T],
        c: &[T],
        cones: &ConeSet<T>,
        settings: &Settings<T>,
    ) -> Result<Self, DataError> {
        _validate(A, b, c, cones, settings)?;

        let mut A = A.clone();
        let b = b.to_vec();
        let c = c.to_vec();
        let (m, n) = (A.nrows(), A.ncols());

        let mut equilibration = Equilibration::new(n, m, settings.scale);
        if settings.normalize {
            equilibration.normalize_A(&mut A, cones, settings);
        }

        Ok(Self {
            A,
            b,
            c,
            n,
            m,
            equilibration,
            norm_b: T::zero(),
            norm_c: T::zero(),
        })
    }

    // record the norms of b and c in their original units, then move the
    // vectors into the scaled space for the duration of the solve
    pub(crate) fn normalize_bc(&mut self, settings: &Settings<T>) {
        self.norm_b = self.b.norm();
        self.norm_c = self.c.norm();

        if settings.normalize {
            let min_scaling = settings.equilibrate_min_scaling;
            self.equilibration
                .normalize_bc(&mut self.b, &mut self.c, min_scaling);
        }
    }

    pub(crate) fn unnormalize_bc(&mut self, settings: &Settings<T>) {
        if settings.normalize {
            self.equilibration.unnormalize_bc(&mut self.b, &mut self.c);
        }
    }
}

fn _validate<T: FloatT>(
    A: &CscMatrix<T>,
    b: &[T],
    c: &[T],
    cones: &ConeSet<T>,
    settings: &Settings<T>,
) -> Result<(), DataError> {
    let (m, n) = (A.nrows(), A.ncols());

    if m == 0 || n == 0 {
        return Err(DataError::EmptyProblem);
    }
    if m < n {
        return Err(DataError::FewerRowsThanCols);
    }
    if b.len() != m || c.len() != n {
        return Err(DataError::IncompatibleDimension);
    }

    // every column must carry at least one nonzero
    if A.colptr.windows(2).any(|w| w[0] >= w[1]) {
        return Err(DataError::EmptyColumn);
    }

    // a nonzero count exceeding m*n indicates duplicate entries
    let nnz = A.nnz();
    if nnz == 0 || (nnz as f64) / (m as f64) > (n as f64) {
        return Err(DataError::BadNonzeroCount);
    }

    A.check_format()?;

    if cones.numel() != m {
        return Err(DataError::ConeDimensionMismatch {
            cones: cones.numel(),
            rows: m,
        });
    }

    settings.validate()?;

    Ok(())
}
