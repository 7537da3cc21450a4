#![allow(non_snake_case)]

/// Adjoint of a matrix
///
/// A lightweight view around a matrix so that `A.t()` can be passed to
/// matrix-vector operations without materializing the transpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjoint<'a, M> {
    pub src: &'a M,
}
