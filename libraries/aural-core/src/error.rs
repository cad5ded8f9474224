//! Error types shared across the trainer

use thiserror::Error;

/// Core errors
#[derive(Debug, Error)]
pub enum CoreError {
    /// Score submission failed (network, serialization, or backend rejection)
    #[error("Score submission failed: {0}")]
    Submission(String),

    /// A value was outside its documented range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl CoreError {
    /// Create a submission error from any displayable cause
    pub fn submission(cause: impl std::fmt::Display) -> Self {
        Self::Submission(cause.to_string())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
