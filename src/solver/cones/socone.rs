use super::*;
use crate::algebra::*;
use core::marker::PhantomData;

// -------------------------------------
// Second-Order Cone
// -------------------------------------

pub struct SecondOrderCone<T> {
    dim: usize,
    phantom: PhantomData<T>,
}

impl<T> SecondOrderCone<T>
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

impl<T> Cone<T> for SecondOrderCone<T>
where
    T: FloatT,
{
    fn numel(&self) -> usize {
        self.dim
    }

    //self dual.  z = (t, w) projects to itself inside the cone,
    //to the origin inside the polar cone, and otherwise to the
    //nearest point on the boundary
    fn project_dual(&self, z: &mut [T]) {
        if z.is_empty() {
            return;
        }

        let t = z[0];
        let norm_w = z[1..].norm();

        if norm_w <= t {
            //do nothing, z is in the cone
        } else if norm_w <= -t {
            z.fill(T::zero());
        } else {
            let half: T = (0.5).as_T();
            let c = half * (T::one() + t / norm_w);
            z[0] = c * norm_w;
            z[1..].scale(c);
        }
    }
}
