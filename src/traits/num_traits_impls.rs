use std::iter::{Product, Sum};

use num_traits::{One, Zero};

use crate::float::Float;
use crate::value::Value;

// ══════════════════════════════════════════════
//  Value<F>
// ══════════════════════════════════════════════

impl<F: Float> Zero for Value<F> {
    #[inline]
    fn zero() -> Self {
        Value::constant(F::zero())
    }
    #[inline]
    fn is_zero(&self) -> bool {
        self.value().is_zero()
    }
}

impl<F: Float> One for Value<F> {
    #[inline]
    fn one() -> Self {
        Value::constant(F::one())
    }
}

// Folding starts from a constant leaf, so an empty sum is a zero constant and
// an empty product a unit constant.

impl<F: Float> Sum for Value<F> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Value::zero(), |acc, v| acc + v)
    }
}

impl<'a, F: Float> Sum<&'a Value<F>> for Value<F> {
    fn sum<I: Iterator<Item = &'a Value<F>>>(iter: I) -> Self {
        iter.fold(Value::zero(), |acc, v| acc + v)
    }
}

impl<F: Float> Product for Value<F> {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Value::one(), |acc, v| acc * v)
    }
}

impl<'a, F: Float> Product<&'a Value<F>> for Value<F> {
    fn product<I: Iterator<Item = &'a Value<F>>>(iter: I) -> Self {
        iter.fold(Value::one(), |acc, v| acc * v)
    }
}
