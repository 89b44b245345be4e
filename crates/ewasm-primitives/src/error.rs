//! Common error types for primitives

use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Wrong number of bytes for a fixed-size value
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },
}

impl From<hex::FromHexError> for PrimitiveError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitiveError::InvalidHex(e.to_string())
    }
}
