//! Errors of the discrete table algebra

use thiserror::Error;

/// Error type for probability table construction and transforms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscreteError {
    /// A filter or transform named a variable the table does not have.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// A malformed filter name or comparator suffix.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Renormalizing (or dividing by) a zero total probability.
    #[error("zero total probability: {0}")]
    ZeroProbability(String),

    /// Two tables that cannot be combined as requested.
    #[error("incompatible distributions: {0}")]
    Incompatible(String),

    /// Any other violated precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl DiscreteError {
    pub fn unknown_variable(name: impl Into<String>) -> Self {
        DiscreteError::UnknownVariable(name.into())
    }

    pub fn incompatible(details: impl Into<String>) -> Self {
        DiscreteError::Incompatible(details.into())
    }

    pub fn invalid_argument(details: impl Into<String>) -> Self {
        DiscreteError::InvalidArgument(details.into())
    }
}
