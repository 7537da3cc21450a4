use super::*;
use core::marker::PhantomData;

// -------------------------------------
// Zero Cone
// -------------------------------------

pub struct ZeroCone<T> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> ZeroCone<T>
where
    T: FloatT,
{
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            phantom: PhantomData,
        }
    }
}

impl<T> Cone<T> for ZeroCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    //the dual of {0} is all of ℝ^dim, so the dual
    //variable on these rows is unconstrained
    fn project_dual(&self, _z: &mut [T]) {}
}
