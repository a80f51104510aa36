//! Error types for settle.
//!
//! Producer rejection reasons are never wrapped in these types: a cell's
//! reason is its own generic payload and travels through untouched. The
//! variants here cover the few failures the library itself can detect.

use thiserror::Error;

/// Errors raised by the library itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettleError {
    /// Combinator input could not be viewed as a sequence
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration document could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for fallible settle operations.
pub type Result<T> = std::result::Result<T, SettleError>;

impl SettleError {
    /// Check if this is an invalid-argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SettleError::InvalidArgument(_))
    }
}

// Cells rejecting with plain strings still need to carry InvalidArgument
impl From<SettleError> for String {
    fn from(e: SettleError) -> Self {
        e.to_string()
    }
}

impl From<serde_json::Error> for SettleError {
    fn from(e: serde_json::Error) -> Self {
        SettleError::Config(e.to_string())
    }
}
