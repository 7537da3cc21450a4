#![allow(non_snake_case)]

use crate::algebra::FloatT;
use enum_dispatch::*;

// the supported cone wrapper type for primitives
// and the composite cone set
mod coneset;
mod supportedcone;
// primitive cone types
mod nonnegativecone;
mod socone;
mod zerocone;

pub use coneset::*;
pub use nonnegativecone::*;
pub use socone::*;
pub use supportedcone::*;
pub use zerocone::*;

/// Operations provided by every primitive cone.
///
/// The iteration engine only ever sees the product cone through
/// [ConeSet](crate::solver::cones::ConeSet), which dispatches these
/// operations blockwise over the dual variable.
#[enum_dispatch]
pub trait Cone<T>
where
    T: FloatT,
{
    /// dimension of the cone block
    fn numel(&self) -> usize;

    /// project `z` onto the dual cone 𝒦* in place.
    ///
    /// The slice must have length [numel](Cone::numel).
    fn project_dual(&self, z: &mut [T]);
}
