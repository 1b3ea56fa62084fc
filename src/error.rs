//! Error types for lazygrad.

use thiserror::Error;

/// Contract violations raised at the API boundary.
///
/// Numeric domain problems (square root of a negative number, logarithm of
/// zero) are not errors: they propagate as NaN/infinity through the graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument outside the accepted range (zero derivative order, empty
    /// variable sequence, invalid logarithm base).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias used by the fallible parts of the API.
pub type Result<T> = std::result::Result<T, Error>;
