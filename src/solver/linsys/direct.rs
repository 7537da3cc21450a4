#![allow(non_snake_case)]

use super::ldl::*;
use super::*;
use std::time::{Duration, Instant};

// -------------------------------------
// subspace solver using a cached direct LDLᵀ factorization
// -------------------------------------

pub(crate) struct DirectLdlSolver<T> {
    factors: LdlFactorization<T>,

    //cumulative solve statistics
    nsolves: usize,
    solve_time: Duration,
}

impl<T> DirectLdlSolver<T>
where
    T: FloatT,
{
    pub fn new(A: &CscMatrix<T>, rho_x: T) -> Result<Self, LinearSolverError> {
        let (m, n) = (A.nrows(), A.ncols());

        let K = _assemble_kkt(A, rho_x);

        // expected signs of D in the LDLᵀ of the quasidefinite operator
        let mut dsigns = vec![1_i8; n + m];
        dsigns[n..].fill(-1);

        let factors = LdlFactorization::new(&K, &dsigns)?;

        // the quasidefinite structure fixes the inertia of the operator
        debug_assert_eq!(factors.positive_inertia, n);

        Ok(Self {
            factors,
            nsolves: 0,
            solve_time: Duration::ZERO,
        })
    }
}

impl<T> LinearSolver<T> for DirectLdlSolver<T>
where
    T: FloatT,
{
    fn method(&self) -> String {
        format!("sparse direct / LDL', nnz(L) = {}", self.factors.nnz())
    }

    fn solve(&mut self, _A: &CscMatrix<T>, rhs: &mut [T], _warm: Option<&[T]>, _iter: Option<u32>) {
        let start = Instant::now();
        self.factors.solve(rhs);
        self.solve_time += start.elapsed();
        self.nsolves += 1;
    }

    fn summary(&mut self) -> Option<String> {
        if self.nsolves == 0 {
            return None;
        }
        let avg = self.solve_time.as_secs_f64() / (self.nsolves as f64);
        self.nsolves = 0;
        self.solve_time = Duration::ZERO;
        Some(format!("Average linear solve time: {:.2e} seconds", avg))
    }
}

// Upper triangle of M = [ρI Aᵀ; A -I] in CSC form.  The first n columns
// carry only their diagonal; column n+j carries row j of A followed by
// the diagonal -1.  Iterating the columns of A in order keeps the row
// indices within each assembled column sorted.
fn _assemble_kkt<T: FloatT>(A: &CscMatrix<T>, rho_x: T) -> CscMatrix<T> {
    let (m, n) = (A.nrows(), A.ncols());
    let nnzK = n + A.nnz() + m;

    let mut K = CscMatrix::<T>::spalloc(n + m, n + m, nnzK);

    // entries per row of A, prefix-summed into the tail columns of K
    let mut rowcount = vec![0usize; m];
    for &row in A.rowval.iter() {
        rowcount[row] += 1;
    }

    K.colptr[0] = 0;
    for j in 0..n {
        K.colptr[j + 1] = K.colptr[j] + 1;
    }
    for j in 0..m {
        K.colptr[n + j + 1] = K.colptr[n + j] + rowcount[j] + 1;
    }

    // ρI block
    for j in 0..n {
        K.rowval[j] = j;
        K.nzval[j] = rho_x;
    }

    // Aᵀ block, filled row of A by row using the running free slot
    let mut next_slot: Vec<usize> = K.colptr[n..n + m].to_vec();
    for col in 0..n {
        for idx in A.colptr[col]..A.colptr[col + 1] {
            let row = A.rowval[idx];
            let dest = next_slot[row];
            K.rowval[dest] = col;
            K.nzval[dest] = A.nzval[idx];
            next_slot[row] += 1;
        }
    }

    // -I block, last in each trailing column
    for j in 0..m {
        let dest = K.colptr[n + j + 1] - 1;
        K.rowval[dest] = n + j;
        K.nzval[dest] = -T::one();
    }

    K
}
