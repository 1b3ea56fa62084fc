use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::float::Float;
use crate::graph::{self, Operand, Partial};
use crate::value::Value;

// ──────────────────────────────────────────────
//  Shared node construction
// ──────────────────────────────────────────────
//
// Every operator impl below, whatever the combination of handles, references
// and scalars, funnels into one of these.

fn add_impl<F: Float>(lhs: Operand<'_, F>, rhs: Operand<'_, F>) -> Value<F> {
    graph::binary(
        lhs,
        Partial::Constant(F::one()),
        rhs,
        Partial::Constant(F::one()),
        lhs.value() + rhs.value(),
    )
}

fn sub_impl<F: Float>(lhs: Operand<'_, F>, rhs: Operand<'_, F>) -> Value<F> {
    graph::binary(
        lhs,
        Partial::Constant(F::one()),
        rhs,
        Partial::Constant(-F::one()),
        lhs.value() - rhs.value(),
    )
}

fn mul_impl<F: Float>(lhs: Operand<'_, F>, rhs: Operand<'_, F>) -> Value<F> {
    graph::binary(
        lhs,
        rhs.as_partial(),
        rhs,
        lhs.as_partial(),
        lhs.value() * rhs.value(),
    )
}

fn div_impl<F: Float>(lhs: Operand<'_, F>, rhs: Operand<'_, F>) -> Value<F> {
    // d/da (a/b) = 1/b, d/db (a/b) = -a/b²
    let (lhs_partial, rhs_partial) = match rhs {
        // No edge to a scalar divisor, so its partial is never read.
        Operand::Constant(c) => (Partial::Constant(c.recip()), Partial::Constant(F::zero())),
        Operand::Tracked(b) => {
            let b1 = b.clone();
            let (a, b2) = (lhs.to_value(), b.clone());
            (
                Partial::lazy(move || b1.recip()),
                Partial::lazy(move || -(&a / &(&b2 * &b2))),
            )
        }
    };
    graph::binary(
        lhs,
        lhs_partial,
        rhs,
        rhs_partial,
        lhs.value() / rhs.value(),
    )
}

fn neg_impl<F: Float>(x: &Value<F>) -> Value<F> {
    graph::unary(x, -x.value(), Partial::Constant(-F::one()))
}

// ──────────────────────────────────────────────
//  Value<F> with Value<F>
// ──────────────────────────────────────────────

macro_rules! impl_value_ops {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident, $imp:ident) => {
        impl<F: Float> $op<&Value<F>> for &Value<F> {
            type Output = Value<F>;
            #[inline]
            fn $method(self, rhs: &Value<F>) -> Value<F> {
                $imp(Operand::Tracked(self), Operand::Tracked(rhs))
            }
        }

        impl<F: Float> $op<Value<F>> for Value<F> {
            type Output = Value<F>;
            #[inline]
            fn $method(self, rhs: Value<F>) -> Value<F> {
                $imp(Operand::Tracked(&self), Operand::Tracked(&rhs))
            }
        }

        impl<F: Float> $op<&Value<F>> for Value<F> {
            type Output = Value<F>;
            #[inline]
            fn $method(self, rhs: &Value<F>) -> Value<F> {
                $imp(Operand::Tracked(&self), Operand::Tracked(rhs))
            }
        }

        impl<F: Float> $op<Value<F>> for &Value<F> {
            type Output = Value<F>;
            #[inline]
            fn $method(self, rhs: Value<F>) -> Value<F> {
                $imp(Operand::Tracked(self), Operand::Tracked(&rhs))
            }
        }

        // Mixed ops: Value<F> with its own base float, on the handle side.
        impl<F: Float> $op<F> for Value<F> {
            type Output = Value<F>;
            #[inline]
            fn $method(self, rhs: F) -> Value<F> {
                $imp(Operand::Tracked(&self), Operand::Constant(rhs))
            }
        }

        impl<F: Float> $op<F> for &Value<F> {
            type Output = Value<F>;
            #[inline]
            fn $method(self, rhs: F) -> Value<F> {
                $imp(Operand::Tracked(self), Operand::Constant(rhs))
            }
        }

        impl<F: Float> $assign_op<Value<F>> for Value<F> {
            #[inline]
            fn $assign_method(&mut self, rhs: Value<F>) {
                *self = $imp(Operand::Tracked(&*self), Operand::Tracked(&rhs));
            }
        }

        impl<F: Float> $assign_op<&Value<F>> for Value<F> {
            #[inline]
            fn $assign_method(&mut self, rhs: &Value<F>) {
                *self = $imp(Operand::Tracked(&*self), Operand::Tracked(rhs));
            }
        }

        impl<F: Float> $assign_op<F> for Value<F> {
            #[inline]
            fn $assign_method(&mut self, rhs: F) {
                *self = $imp(Operand::Tracked(&*self), Operand::Constant(rhs));
            }
        }
    };
}

impl_value_ops!(Add, add, AddAssign, add_assign, add_impl);
impl_value_ops!(Sub, sub, SubAssign, sub_assign, sub_impl);
impl_value_ops!(Mul, mul, MulAssign, mul_assign, mul_impl);
impl_value_ops!(Div, div, DivAssign, div_assign, div_impl);

impl<F: Float> Neg for Value<F> {
    type Output = Value<F>;
    #[inline]
    fn neg(self) -> Value<F> {
        neg_impl(&self)
    }
}

impl<F: Float> Neg for &Value<F> {
    type Output = Value<F>;
    #[inline]
    fn neg(self) -> Value<F> {
        neg_impl(self)
    }
}

// ──────────────────────────────────────────────
//  Primitive floats on the left-hand side
// ──────────────────────────────────────────────
//
// Coherence forbids `impl<F> Add<Value<F>> for F`, so these are generated for
// f32 and f64 via a macro.

macro_rules! impl_scalar_lhs_ops {
    (@op $f:ty, $op:ident, $method:ident, $imp:ident) => {
        impl $op<Value<$f>> for $f {
            type Output = Value<$f>;
            #[inline]
            fn $method(self, rhs: Value<$f>) -> Value<$f> {
                $imp(Operand::Constant(self), Operand::Tracked(&rhs))
            }
        }

        impl $op<&Value<$f>> for $f {
            type Output = Value<$f>;
            #[inline]
            fn $method(self, rhs: &Value<$f>) -> Value<$f> {
                $imp(Operand::Constant(self), Operand::Tracked(rhs))
            }
        }
    };
    ($f:ty) => {
        impl_scalar_lhs_ops!(@op $f, Add, add, add_impl);
        impl_scalar_lhs_ops!(@op $f, Sub, sub, sub_impl);
        impl_scalar_lhs_ops!(@op $f, Mul, mul, mul_impl);
        impl_scalar_lhs_ops!(@op $f, Div, div, div_impl);
    };
}

impl_scalar_lhs_ops!(f32);
impl_scalar_lhs_ops!(f64);
