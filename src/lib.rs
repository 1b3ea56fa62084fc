//! Reverse-mode automatic differentiation over a lazily differentiated
//! computation graph.
//!
//! Arithmetic on [`Value`] handles records a DAG of immutable nodes. Each edge
//! stores its local partial derivative as a deferred computation on `Value`s,
//! so the result of [`differentiate`] is itself differentiable: higher-order
//! and mixed partials are obtained by differentiating again.
//!
//! ```
//! use lazygrad::{differentiate, differentiate_n, Value};
//!
//! let x = Value::new(0.5_f64);
//! let y = x.sin() * &x;
//!
//! let dy = differentiate(&y).wrt(&x);
//! assert!((dy.value() - (0.5_f64.cos() * 0.5 + 0.5_f64.sin())).abs() < 1e-12);
//!
//! let d2y = differentiate_n(&y, &x, 2).unwrap();
//! assert!((d2y.value() - (2.0 * 0.5_f64.cos() - 0.5 * 0.5_f64.sin())).abs() < 1e-12);
//! ```

pub mod engine;
pub mod error;
pub mod export;
pub mod float;
pub mod graph;
mod ops;
pub mod result;
pub mod value;
mod traits;

pub use engine::{differentiate, differentiate_n, differentiate_wrt};
pub use error::{Error, Result};
pub use float::Float;
pub use graph::{Edge, NodeId, Partial};
pub use result::DerivativeResult;
pub use value::Value;

/// Type alias for graph handles over `f64`.
pub type Value64 = Value<f64>;
/// Type alias for graph handles over `f32`.
pub type Value32 = Value<f32>;
