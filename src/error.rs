//! Error types shared by the evaluation and hypothesis-testing engines
//!
//! Every failure is fatal to the single call that raised it. Numeric
//! degeneracies (empty rows in normalization, classes that never occur)
//! are not errors: they collapse to a defined fallback value instead.

use thiserror::Error;

/// Errors raised at the boundary of every public operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Malformed arrays: length mismatch, out-of-range labels, empty input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unrecognized enum value or out-of-domain scalar
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded or failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for evaluation operations
pub type Result<T> = std::result::Result<T, EvalError>;

impl EvalError {
    pub(crate) fn input(msg: impl Into<String>) -> Self {
        EvalError::InvalidInput(msg.into())
    }

    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        EvalError::InvalidArgument(msg.into())
    }
}

/// Fail with `InvalidInput` unless both sequences have the same length
pub(crate) fn check_consistent_length(a: usize, b: usize, what: &str) -> Result<()> {
    if a != b {
        return Err(EvalError::input(format!(
            "{what}: found sequences of inconsistent lengths [{a}, {b}]"
        )));
    }
    Ok(())
}

/// Fail with `InvalidInput` if any value is NaN or infinite
pub(crate) fn check_finite(values: &[f64], name: &str) -> Result<()> {
    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(EvalError::input(format!(
            "`{name}` contains a non-finite value at index {pos}"
        )));
    }
    Ok(())
}
