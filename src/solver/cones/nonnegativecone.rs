use super::*;
use core::marker::PhantomData;

// -------------------------------------
// Nonnegative Cone
// -------------------------------------

pub struct NonnegativeCone<T> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> NonnegativeCone<T>
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

impl<T> Cone<T> for NonnegativeCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    //self dual
    fn project_dual(&self, z: &mut [T]) {
        for zi in z.iter_mut() {
            if *zi < T::zero() {
                *zi = T::zero();
            }
        }
    }
}

#[test]
fn test_nonnegative_projection() {
    let K = NonnegativeCone::<f64>::new(4);
    let mut z = vec![1., -2., 0., 3.];
    K.project_dual(&mut z);
    assert_eq!(z, vec![1., 0., 0., 3.]);
}
