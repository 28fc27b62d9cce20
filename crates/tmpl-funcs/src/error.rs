//! Error types for template functions.

use crate::function::Arity;

/// Errors a template function can report.
///
/// Lenient functions never produce these; they degrade to a zero value
/// instead. Only the `must*` variants, `dig`, `fail` and the registry's
/// arity check surface failures.
#[derive(Debug, thiserror::Error)]
pub enum FuncError {
    /// A strict variant could not perform its conversion.
    #[error("{0}")]
    Conversion(String),

    /// A `dig` path segment did not resolve.
    #[error("key {0} not found")]
    KeyNotFound(String),

    /// The function was called with the wrong number of arguments.
    #[error("wrong number of args for {name}: want {expected} got {got}")]
    Arity {
        name: &'static str,
        expected: Arity,
        got: usize,
    },

    /// No function with this name is registered.
    #[error("function {0:?} not defined")]
    UnknownFunction(String),

    /// Explicit failure requested by the template via `fail`.
    #[error("{0}")]
    Failed(String),

    /// Input could not be decoded (base64, base32, ciphertext).
    #[error("{0}")]
    Encoding(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl FuncError {
    /// Create a conversion error.
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }
}

/// Result type returned by every template function.
pub type FuncResult = Result<crate::Value, FuncError>;
