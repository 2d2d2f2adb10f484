//! Error types for SDATA conversion

use thiserror::Error;

/// Errors that can occur while converting an SDATA block
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer is not exactly one SDATA block long
    #[error("invalid SDATA length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Result type for SDATA conversion operations
pub type CodecResult<T> = Result<T, CodecError>;
