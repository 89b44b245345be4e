//! State store error types

use thiserror::Error;

/// State store errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    /// No vertex at the given path
    #[error("no vertex at path: {0}")]
    NotFound(String),

    /// Paths must name at least one edge
    #[error("empty path")]
    EmptyPath,

    /// Stored value could not be decoded
    #[error("invalid value at {path}: {reason}")]
    InvalidValue {
        /// Path of the offending vertex
        path: String,
        /// Decoder message
        reason: String,
    },
}

/// Result type for state operations
pub type StateResult<T> = Result<T, StateError>;
