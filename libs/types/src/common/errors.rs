//! Error types for identity parsing and validation

use thiserror::Error;

/// Errors that can occur while building a typed identity
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identity is all zero bytes where a real identity is required
    #[error("ID cannot be null/zero")]
    NullId,

    /// Input is not valid hexadecimal
    #[error("Invalid hex identity: '{input}'")]
    InvalidHex { input: String },

    /// Decoded identity has the wrong byte length
    #[error("Invalid identity length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
