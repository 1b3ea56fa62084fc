//! Every elementary operation checked against central finite differences.

use approx::assert_relative_eq;
use lazygrad::{differentiate, Value};

const H: f64 = 1e-6;
const TOL: f64 = 1e-4;

const REALS: [f64; 5] = [0.1, 1.0, -1.0, 3.5, -3.5];
const POSITIVES: [f64; 3] = [1.1, 2.0, 3.5];
const UNIT_INTERVAL: [f64; 5] = [-0.9, -0.4, 0.0, 0.4, 0.9];

/// Central difference of `f` at `x`, evaluating through `Value` so the
/// primal path is the one under test.
fn finite_diff(f: &impl Fn(&Value<f64>) -> Value<f64>, x: f64) -> f64 {
    let plus = f(&Value::new(x + H)).value();
    let minus = f(&Value::new(x - H)).value();
    (plus - minus) / (2.0 * H)
}

fn check_unary(name: &str, f: impl Fn(&Value<f64>) -> Value<f64>, points: &[f64]) {
    for &p in points {
        let x = Value::new(p);
        let y = f(&x);
        let grad = differentiate(&y).wrt(&x).value();
        let expected = finite_diff(&f, p);
        assert!(
            (grad - expected).abs() <= TOL * (1.0 + expected.abs()),
            "{name} at {p}: reverse {grad}, finite difference {expected}"
        );
    }
}

fn check_binary(
    name: &str,
    f: impl Fn(&Value<f64>, &Value<f64>) -> Value<f64>,
    points: &[(f64, f64)],
) {
    for &(a, b) in points {
        let x = Value::new(a);
        let y = Value::new(b);
        let z = f(&x, &y);
        let d = differentiate(&z);

        let fx = |v: &Value<f64>| f(v, &Value::new(b));
        let fy = |v: &Value<f64>| f(&Value::new(a), v);
        let (dx, dy) = (finite_diff(&fx, a), finite_diff(&fy, b));

        let (gx, gy) = (d.wrt(&x).value(), d.wrt(&y).value());
        assert!(
            (gx - dx).abs() <= TOL * (1.0 + dx.abs()),
            "{name} at ({a}, {b}): d/dx reverse {gx}, finite difference {dx}"
        );
        assert!(
            (gy - dy).abs() <= TOL * (1.0 + dy.abs()),
            "{name} at ({a}, {b}): d/dy reverse {gy}, finite difference {dy}"
        );
    }
}

const QUADRANTS: [(f64, f64); 4] = [(5.0, 5.0), (-5.0, 5.0), (5.0, -5.0), (-5.0, -5.0)];

// ── Arithmetic ──

#[test]
fn arithmetic() {
    check_binary("add", |a, b| a + b, &QUADRANTS);
    check_binary("sub", |a, b| a - b, &QUADRANTS);
    check_binary("mul", |a, b| a * b, &QUADRANTS);
    check_binary("div", |a, b| a / b, &QUADRANTS);
    check_unary("neg", |x| -x, &REALS);
    check_unary("scalar div", |x| 1.5_f64 / x, &REALS);
    check_unary("div by scalar", |x| x / 1.5, &REALS);
}

// ── Powers ──

#[test]
fn powers() {
    check_unary("recip", |x| x.recip(), &REALS);
    check_unary("square", |x| x.square(), &REALS);
    check_unary("powi 3", |x| x.powi(3), &REALS);
    check_unary("powi -2", |x| x.powi(-2), &REALS);
    check_unary("powf 2.5", |x| x.powf(2.5), &POSITIVES);
    check_unary("sqrt", |x| x.sqrt(), &POSITIVES);
    check_unary("cbrt", |x| x.cbrt(), &REALS);
}

#[test]
fn pow_over_a_grid() {
    let mut points = Vec::new();
    for &base in &POSITIVES {
        for &exponent in &[-2.0, -0.5, 0.5, 1.0, 3.0] {
            points.push((base, exponent));
        }
    }
    check_binary("pow", |a, b| a.pow(b), &points);
}

#[test]
fn scalar_base_pow() {
    for base in [0.5, 2.0, 10.0] {
        check_unary("scalar_pow", |x| Value::scalar_pow(base, x), &REALS);
    }
}

#[test]
fn scalar_base_pow_links_only_the_exponent() {
    let x = Value::new(3.0_f64);
    let y = Value::scalar_pow(2.0, &x);
    assert_eq!(y.value(), 8.0);
    assert_eq!(y.edges().len(), 1);
    assert!(y.edges()[0].to().ptr_eq(&x));

    let d = differentiate(&y);
    assert_eq!(d.len(), 2);
    assert_relative_eq!(d.wrt(&x).value(), 8.0 * 2.0_f64.ln(), max_relative = 1e-12);

    // 0^y has a zero exponent slope; any base to the 0 is exactly 1.
    let zero_base = Value::scalar_pow(0.0, &x);
    assert_eq!(differentiate(&zero_base).wrt(&x).value(), 0.0);
    assert_eq!(Value::scalar_pow(0.0, &Value::new(0.0_f64)).value(), 1.0);
}

#[test]
fn hypot() {
    check_binary("hypot", |a, b| a.hypot(b), &QUADRANTS);
}

// ── Sign ──

#[test]
fn sign_functions() {
    check_unary("abs", |x| x.abs(), &REALS);
    check_unary("signum", |x| x.signum(), &REALS);
    check_binary("copysign", |a, b| a.copysign(b), &QUADRANTS);
}

// ── Exp/Log ──

#[test]
fn exponentials() {
    check_unary("exp", |x| x.exp(), &REALS);
    check_unary("exp2", |x| x.exp2(), &REALS);
}

#[test]
fn logarithms() {
    check_unary("ln", |x| x.ln(), &POSITIVES);
    check_unary("log2", |x| x.log2(), &POSITIVES);
    check_unary("log10", |x| x.log10(), &POSITIVES);
    for base in [0.5, 2.0, 3.0, 10.0] {
        check_unary(
            "log",
            |x| x.log(base).expect("valid base"),
            &POSITIVES,
        );
    }
}

#[test]
fn log_with_a_tracked_base() {
    let mut points = Vec::new();
    for &x in &POSITIVES {
        for &base in &[0.5, 2.0, 7.0] {
            points.push((x, base));
        }
    }
    check_binary(
        "log_base",
        |a, b| a.log_base(b).expect("valid base"),
        &points,
    );
}

// ── Trig ──

#[test]
fn trigonometric() {
    check_unary("sin", |x| x.sin(), &REALS);
    check_unary("cos", |x| x.cos(), &REALS);
    check_unary("tan", |x| x.tan(), &REALS);
    check_unary("sec", |x| x.sec(), &REALS);
    check_unary("csc", |x| x.csc(), &REALS);
    check_unary("cot", |x| x.cot(), &REALS);
}

#[test]
fn inverse_trigonometric() {
    check_unary("asin", |x| x.asin(), &UNIT_INTERVAL);
    check_unary("acos", |x| x.acos(), &UNIT_INTERVAL);
    check_unary("atan", |x| x.atan(), &REALS);
    check_binary("atan2", |a, b| a.atan2(b), &QUADRANTS);
}

// ── Hyperbolic ──

#[test]
fn hyperbolic() {
    check_unary("sinh", |x| x.sinh(), &REALS);
    check_unary("cosh", |x| x.cosh(), &REALS);
    check_unary("tanh", |x| x.tanh(), &REALS);
    check_unary("asinh", |x| x.asinh(), &REALS);
    check_unary("acosh", |x| x.acosh(), &POSITIVES);
    check_unary("atanh", |x| x.atanh(), &UNIT_INTERVAL);
}

// ── Error function ──

#[test]
fn error_function() {
    check_unary("erf", |x| x.erf(), &REALS);
    check_unary("erfc", |x| x.erfc(), &REALS);
}

// ── Composites ──

#[test]
fn composite_expressions() {
    check_unary("sin(x)·exp(x)", |x| x.sin() * x.exp(), &REALS);
    check_unary("ln(1 + x²)", |x| (x.square() + 1.0).ln(), &REALS);
    check_unary("tanh(x)/x", |x| x.tanh() / x, &REALS);
    check_binary(
        "x·sin(y) + cosh(x·y)",
        |a, b| a * &b.sin() + (a * b).cosh(),
        &[(0.3, 0.7), (-1.2, 0.4), (2.0, -0.5)],
    );
}

// ── Exact slopes ──

#[test]
fn exact_slopes_at_kinks() {
    let x = Value::new(0.0_f64);
    let d = differentiate(&x.abs());
    assert_eq!(d.wrt(&x).value(), 1.0);

    let x = Value::new(-2.0_f64);
    let d = differentiate(&x.signum());
    assert_eq!(d.wrt(&x).value(), 0.0);
}

#[test]
fn zero_exponent_and_zero_base() {
    let x = Value::new(0.0_f64);
    let y = Value::new(0.0_f64);
    let z = x.pow(&y);
    assert_eq!(z.value(), 1.0);
    let d = differentiate(&z);
    assert_eq!(d.wrt(&x).value(), 0.0);
    assert_eq!(d.wrt(&y).value(), 0.0);

    let z = x.powf(0.0);
    assert_eq!(z.value(), 1.0);
    assert_eq!(differentiate(&z).wrt(&x).value(), 0.0);

    // 0^2: base slope 2·0 = 0, exponent slope taken as 0 rather than 0·ln 0.
    let e = Value::new(2.0_f64);
    let z = x.pow(&e);
    let d = differentiate(&z);
    assert_eq!(d.wrt(&x).value(), 0.0);
    assert_eq!(d.wrt(&e).value(), 0.0);
}

#[test]
fn copysign_slope_follows_both_signs() {
    for (m, s, slope) in [(2.0_f64, 3.0, 1.0), (2.0, -3.0, -1.0), (-2.0, 3.0, -1.0), (-2.0, -3.0, 1.0)] {
        let x = Value::new(m);
        let y = Value::new(s);
        let d = differentiate(&x.copysign(&y));
        assert_relative_eq!(d.wrt(&x).value(), slope);
        assert_eq!(d.wrt(&y).value(), 0.0);
    }
}

#[test]
fn f32_elementals() {
    let x = Value::new(0.5_f32);
    let y = x.sin() * x.exp();
    let grad = differentiate(&y).wrt(&x).value();
    let expected = 0.5_f32.cos() * 0.5_f32.exp() + 0.5_f32.sin() * 0.5_f32.exp();
    assert_relative_eq!(grad, expected, max_relative = 1e-5);

    let e = Value::new(0.25_f32).erf();
    assert_relative_eq!(e.value(), 0.276_326_4, max_relative = 1e-5);
}
