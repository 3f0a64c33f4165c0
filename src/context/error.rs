//! Context argument errors.

use thiserror::Error;

/// Errors that can occur when reading or writing context arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Context argument '{key}' not found")]
    NotFound { key: String },

    #[error("Context argument '{key}' has an unexpected type: {message}")]
    TypeMismatch { key: String, message: String },

    #[error("Context argument '{key}' could not be encoded: {message}")]
    Encoding { key: String, message: String },
}
