//! Shared error type for calculation values and operators
//!
//! Operator failures name the accepted shapes; nothing is silently
//! coerced. Every failure propagates to the caller as a `Result`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for value and operator failures
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum AleatorError {
    /// An operator was handed a value shape it does not accept.
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: String },

    /// Elementwise combination of sequences with different lengths.
    #[error("length mismatch: {left} samples vs {right} samples")]
    LengthMismatch { left: usize, right: usize },

    /// Positional combination of frames with different column counts.
    #[error("column count mismatch: {left} columns vs {right} columns")]
    ColumnMismatch { left: usize, right: usize },

    /// Lookup of a name no caller ever computed into a context.
    #[error("no value named '{0}' in calculation context")]
    NameNotFound(String),

    /// Array-operator inputs spanning more than one existing context.
    #[error("inputs span {0} distinct calculation contexts, expected at most one")]
    MixedContexts(usize),

    /// Any other violated precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AleatorError {
    /// Shorthand for a `TypeMismatch` from string-ish parts.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        AleatorError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid_argument(details: impl Into<String>) -> Self {
        AleatorError::InvalidArgument(details.into())
    }
}
