use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for base floating-point types (`f32`, `f64`).
///
/// Bundles the numeric and utility traits needed by the graph and the
/// elementary operations. Only primitive float types implement this; the
/// differentiable [`Value`](crate::Value) handle does not.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Default + Debug + Display + 'static
{
    /// Convert an `f64` literal, falling back to NaN if it is not representable.
    #[inline]
    fn from_lossy(v: f64) -> Self {
        <Self as FromPrimitive>::from_f64(v).unwrap_or_else(<Self as NumFloat>::nan)
    }

    /// Widen to `f64` for routines only available in double precision.
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl Float for f32 {}
impl Float for f64 {}
