//! Error types for the identity number engine

use thiserror::Error;

/// Main error type for engine operations
///
/// Validation problems are not errors: they are reported per candidate as
/// [`crate::validator::FailureReason`] inside a validation result.
#[derive(Error, Debug)]
pub enum IdError {
    /// Checksum input was not exactly 17 characters long
    #[error("Invalid length: expected 17 characters, got {0}")]
    InvalidLength(usize),

    /// Checksum input contained something other than an ASCII digit
    #[error("Invalid character: {0:?}")]
    InvalidCharacter(char),

    /// Generation constraints out of range or malformed
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Region dataset source could not be read
    #[error("Dataset load error: {0}")]
    DatasetLoad(String),

    /// Report serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, IdError>;
