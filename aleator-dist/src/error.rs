//! Parameter validation errors

use thiserror::Error;

/// Error type for distribution construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DistributionError {
    pub fn invalid(details: impl Into<String>) -> Self {
        DistributionError::InvalidParameter(details.into())
    }
}
