use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};

/// Trait for floating point types used in the splitcone solver
///
/// All floating point calculations in splitcone are represented internally
/// on values implementing the FloatT trait, with implementations provided
/// for the f32 and f64 native types.
///
/// FloatT relies on [num_traits](num_traits) for most of its constituent
/// trait bounds.

pub trait FloatT:
    'static
    + Send
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + std::fmt::Display
    + std::fmt::LowerExp
    + std::fmt::Debug
{
}
impl FloatT for f32 {}
impl FloatT for f64 {}

/// Trait for converting Rust primitives to [FloatT](crate::algebra::FloatT)
///
/// Implemented on f32/64 and u32/64 so that constant primitives can be
/// written as `(2.0).as_T()` everywhere, rather than the awful
/// `T::from_f64(2.0).unwrap()`.

#[allow(non_snake_case)]
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_T {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_T!(u32, from_u32);
impl_as_T!(u64, from_u64);
impl_as_T!(usize, from_usize);
impl_as_T!(f32, from_f32);
impl_as_T!(f64, from_f64);
