//! Elementary operations on [`Value`].
//!
//! Each operation builds one node through `graph::unary` / `graph::binary`
//! with partials that are themselves written in terms of `Value` operations,
//! so every derivative can be differentiated again. Partials that only need a
//! slope known at construction time use [`Partial::Constant`]; everything else
//! is deferred with [`Partial::lazy`] and captures its operands, never the
//! result node.

use crate::error::{Error, Result};
use crate::float::Float;
use crate::graph::{self, Operand, Partial};
use crate::value::Value;

impl<F: Float> Value<F> {
    // ── Powers ──

    pub fn recip(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().recip(),
            Partial::lazy(move || -x.square().recip()),
        )
    }

    /// `x²`, built as a single power node.
    pub fn square(&self) -> Self {
        self.powi(2)
    }

    pub fn powi(&self, n: i32) -> Self {
        if n == 0 {
            return graph::unary(self, F::one(), Partial::Constant(F::zero()));
        }
        let x = self.clone();
        let scale = F::from_lossy(f64::from(n));
        graph::unary(
            self,
            self.value().powi(n),
            Partial::lazy(move || x.powi(n - 1) * scale),
        )
    }

    /// `x^n` for a constant exponent. `n == 0` gives exactly 1 with a zero
    /// slope, even at `x == 0`.
    pub fn powf(&self, n: F) -> Self {
        if n == F::zero() {
            return graph::unary(self, F::one(), Partial::Constant(F::zero()));
        }
        let x = self.clone();
        graph::unary(
            self,
            self.value().powf(n),
            Partial::lazy(move || x.powf(n - F::one()) * n),
        )
    }

    /// `x^y` with both base and exponent on the graph.
    ///
    /// `∂/∂x = y·x^(y-1)` (zero when the exponent is 0), `∂/∂y = x^y·ln x`
    /// (zero when the base is 0, the limit from the right).
    pub fn pow(&self, exponent: &Value<F>) -> Self {
        let (x, y) = (self.value(), exponent.value());
        let value = if y == F::zero() { F::one() } else { x.powf(y) };

        let base_partial = if y == F::zero() {
            Partial::Constant(F::zero())
        } else {
            let (b, e) = (self.clone(), exponent.clone());
            Partial::lazy(move || b.pow(&(&e - F::one())) * &e)
        };
        let exponent_partial = if x == F::zero() {
            Partial::Constant(F::zero())
        } else {
            let (b, e) = (self.clone(), exponent.clone());
            Partial::lazy(move || b.ln() * b.pow(&e))
        };
        graph::binary(
            Operand::Tracked(self),
            base_partial,
            Operand::Tracked(exponent),
            exponent_partial,
            value,
        )
    }

    /// `base^exponent` for a constant base. The node has a single edge, to
    /// the exponent, with slope `base^y · ln base` (zero when `base == 0`).
    pub fn scalar_pow(base: F, exponent: &Value<F>) -> Self {
        let y = exponent.value();
        let value = if y == F::zero() { F::one() } else { base.powf(y) };
        let partial = if base == F::zero() {
            Partial::Constant(F::zero())
        } else {
            let e = exponent.clone();
            let ln_base = base.ln();
            Partial::lazy(move || Value::scalar_pow(base, &e) * ln_base)
        };
        graph::unary(exponent, value, partial)
    }

    pub fn sqrt(&self) -> Self {
        let x = self.clone();
        let two = F::from_lossy(2.0);
        graph::unary(
            self,
            self.value().sqrt(),
            Partial::lazy(move || (x.sqrt() * two).recip()),
        )
    }

    pub fn cbrt(&self) -> Self {
        let x = self.clone();
        let three = F::from_lossy(3.0);
        graph::unary(
            self,
            self.value().cbrt(),
            Partial::lazy(move || (x.cbrt().square() * three).recip()),
        )
    }

    /// `sqrt(x² + y²)`.
    pub fn hypot(&self, other: &Value<F>) -> Self {
        (self * self + other * other).sqrt()
    }

    // ── Sign ──

    /// Absolute value. The slope at exactly 0 is taken as `+1`.
    pub fn abs(&self) -> Self {
        let slope = if self.value() >= F::zero() {
            F::one()
        } else {
            -F::one()
        };
        graph::unary(self, self.value().abs(), Partial::Constant(slope))
    }

    pub fn signum(&self) -> Self {
        graph::unary(self, self.value().signum(), Partial::Constant(F::zero()))
    }

    /// Magnitude of `self` with the sign of `sign`. Only the magnitude is
    /// differentiated; the result is piecewise constant in `sign`.
    pub fn copysign(&self, sign: &Value<F>) -> Self {
        let (m, s) = (self.value(), sign.value());
        let slope = if m.is_sign_negative() == s.is_sign_negative() {
            F::one()
        } else {
            -F::one()
        };
        graph::unary(self, m.copysign(s), Partial::Constant(slope))
    }

    // ── Exp/Log ──

    pub fn exp(&self) -> Self {
        let x = self.clone();
        graph::unary(self, self.value().exp(), Partial::lazy(move || x.exp()))
    }

    pub fn exp2(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().exp2(),
            Partial::lazy(move || x.exp2() * F::LN_2()),
        )
    }

    pub fn ln(&self) -> Self {
        let x = self.clone();
        graph::unary(self, self.value().ln(), Partial::lazy(move || x.recip()))
    }

    pub fn log2(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().log2(),
            Partial::lazy(move || (&x * F::LN_2()).recip()),
        )
    }

    pub fn log10(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().log10(),
            Partial::lazy(move || (&x * F::LN_10()).recip()),
        )
    }

    /// Logarithm with a constant base.
    ///
    /// Fails with [`Error::InvalidArgument`] unless `base` is finite, positive
    /// and not 1.
    pub fn log(&self, base: F) -> Result<Self> {
        check_log_base(base)?;
        let x = self.clone();
        let ln_base = base.ln();
        Ok(graph::unary(
            self,
            self.value().ln() / ln_base,
            Partial::lazy(move || (&x * ln_base).recip()),
        ))
    }

    /// Logarithm with a base that is itself on the graph.
    ///
    /// The base is validated on its current value, as in [`Value::log`].
    pub fn log_base(&self, base: &Value<F>) -> Result<Self> {
        check_log_base(base.value())?;
        let (x, b) = (self.clone(), base.clone());
        let x_partial = Partial::lazy(move || (&x * &b.ln()).recip());
        // d/db (ln x / ln b) = -log_b(x) / (b · ln b)
        let (x, b) = (self.clone(), base.clone());
        let base_partial = Partial::lazy(move || {
            let ln_b = b.ln();
            -(x.ln() / &ln_b) / (&b * &ln_b)
        });
        Ok(graph::binary(
            Operand::Tracked(self),
            x_partial,
            Operand::Tracked(base),
            base_partial,
            self.value().ln() / base.value().ln(),
        ))
    }

    // ── Trig ──

    pub fn sin(&self) -> Self {
        let x = self.clone();
        graph::unary(self, self.value().sin(), Partial::lazy(move || x.cos()))
    }

    pub fn cos(&self) -> Self {
        let x = self.clone();
        graph::unary(self, self.value().cos(), Partial::lazy(move || -x.sin()))
    }

    pub fn tan(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().tan(),
            Partial::lazy(move || x.sec().square()),
        )
    }

    pub fn sec(&self) -> Self {
        self.cos().recip()
    }

    pub fn csc(&self) -> Self {
        self.sin().recip()
    }

    pub fn cot(&self) -> Self {
        self.tan().recip()
    }

    pub fn asin(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().asin(),
            Partial::lazy(move || one_minus_square(&x).sqrt().recip()),
        )
    }

    pub fn acos(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().acos(),
            Partial::lazy(move || -one_minus_square(&x).sqrt().recip()),
        )
    }

    pub fn atan(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().atan(),
            Partial::lazy(move || (x.square() + F::one()).recip()),
        )
    }

    /// Four-quadrant arctangent of `self / x`.
    pub fn atan2(&self, x: &Value<F>) -> Self {
        let (yy, xx) = (self.clone(), x.clone());
        let y_partial = Partial::lazy(move || &xx / &(xx.square() + yy.square()));
        let (yy, xx) = (self.clone(), x.clone());
        let x_partial = Partial::lazy(move || -(&yy / &(xx.square() + yy.square())));
        graph::binary(
            Operand::Tracked(self),
            y_partial,
            Operand::Tracked(x),
            x_partial,
            self.value().atan2(x.value()),
        )
    }

    // ── Hyperbolic ──

    pub fn sinh(&self) -> Self {
        let x = self.clone();
        graph::unary(self, self.value().sinh(), Partial::lazy(move || x.cosh()))
    }

    pub fn cosh(&self) -> Self {
        let x = self.clone();
        graph::unary(self, self.value().cosh(), Partial::lazy(move || x.sinh()))
    }

    pub fn tanh(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().tanh(),
            Partial::lazy(move || one_minus_square(&x.tanh())),
        )
    }

    pub fn asinh(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().asinh(),
            Partial::lazy(move || (x.square() + F::one()).sqrt().recip()),
        )
    }

    pub fn acosh(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().acosh(),
            Partial::lazy(move || (x.square() - F::one()).sqrt().recip()),
        )
    }

    pub fn atanh(&self) -> Self {
        let x = self.clone();
        graph::unary(
            self,
            self.value().atanh(),
            Partial::lazy(move || one_minus_square(&x).recip()),
        )
    }

    // ── Error function ──

    pub fn erf(&self) -> Self {
        let x = self.clone();
        let value = F::from_lossy(libm::erf(self.value().to_f64_lossy()));
        graph::unary(
            self,
            value,
            Partial::lazy(move || gaussian_kernel(&x) * F::FRAC_2_SQRT_PI()),
        )
    }

    pub fn erfc(&self) -> Self {
        let x = self.clone();
        let value = F::from_lossy(libm::erfc(self.value().to_f64_lossy()));
        graph::unary(
            self,
            value,
            Partial::lazy(move || gaussian_kernel(&x) * -F::FRAC_2_SQRT_PI()),
        )
    }

    // ── Selectors ──
    //
    // These build no node: the result is the selected operand's own handle,
    // so its derivative is exactly 1 and the other operand's exactly 0.
    // Ties select `self`.

    /// The larger operand's own handle. On a tie this is `self`, never
    /// `other`, so `a.max(&b)` and `b.max(&a)` differentiate differently when
    /// `a == b`.
    pub fn max(&self, other: &Value<F>) -> Self {
        if other.value() > self.value() {
            other.clone()
        } else {
            self.clone()
        }
    }

    /// The smaller operand's own handle. On a tie this is `self`, never
    /// `other`.
    pub fn min(&self, other: &Value<F>) -> Self {
        if other.value() < self.value() {
            other.clone()
        } else {
            self.clone()
        }
    }

    /// `max` against a literal; a selected literal becomes a constant leaf.
    pub fn max_scalar(&self, other: F) -> Self {
        if other > self.value() {
            Value::constant(other)
        } else {
            self.clone()
        }
    }

    /// `min` against a literal; a selected literal becomes a constant leaf.
    pub fn min_scalar(&self, other: F) -> Self {
        if other < self.value() {
            Value::constant(other)
        } else {
            self.clone()
        }
    }
}

fn check_log_base<F: Float>(base: F) -> Result<()> {
    if base.is_finite() && base > F::zero() && base != F::one() {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "logarithm base must be finite, positive and not 1, got {base}"
        )))
    }
}

/// `1 - x²`
fn one_minus_square<F: Float>(x: &Value<F>) -> Value<F> {
    -x.square() + F::one()
}

/// `exp(-x²)`
fn gaussian_kernel<F: Float>(x: &Value<F>) -> Value<F> {
    (-x.square()).exp()
}
