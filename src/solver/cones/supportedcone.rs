use super::*;
use enum_dispatch::*;

// -------------------------------------
// user facing cone specification
// -------------------------------------

/// API type describing the constituents of a composite cone.
///
/// The total dimension over all entries must equal the row dimension of
/// the constraint matrix A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SupportedConeT {
    /// The zero cone (used for equality constraints).
    ///
    /// The parameter indicates the cone's dimension.
    ZeroConeT(usize),
    /// The nonnegative orthant.
    ///
    /// The parameter indicates the cone's dimension.
    NonnegativeConeT(usize),
    /// The second-order cone.
    ///
    /// The parameter indicates the cone's dimension.
    SecondOrderConeT(usize),
}

impl SupportedConeT {
    /// number of variables in the cone
    pub fn nvars(&self) -> usize {
        match self {
            SupportedConeT::ZeroConeT(dim) => *dim,
            SupportedConeT::NonnegativeConeT(dim) => *dim,
            SupportedConeT::SecondOrderConeT(dim) => *dim,
        }
    }
}

// -------------------------------------
// internal dispatch wrapper
// -------------------------------------

#[enum_dispatch(Cone<T>)]
pub enum SupportedCone<T>
where
    T: FloatT,
{
    ZeroCone(ZeroCone<T>),
    NonnegativeCone(NonnegativeCone<T>),
    SecondOrderCone(SecondOrderCone<T>),
}

// force a concrete cone type from the user's specification
pub(crate) fn make_cone<T: FloatT>(cone: SupportedConeT) -> SupportedCone<T> {
    match cone {
        SupportedConeT::ZeroConeT(dim) => ZeroCone::<T>::new(dim).into(),
        SupportedConeT::NonnegativeConeT(dim) => NonnegativeCone::<T>::new(dim).into(),
        SupportedConeT::SecondOrderConeT(dim) => SecondOrderCone::<T>::new(dim).into(),
    }
}
