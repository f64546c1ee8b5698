//! Shared error types used across photoshare crates.

use thiserror::Error;

/// Caller-supplied data violates a precondition.
///
/// These are reported back to the caller verbatim and never logged as faults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required string argument is empty.
    #[error("Required argument number {index} is an empty string")]
    EmptyArgument {
        /// Position of the argument in the validated list.
        index: usize,
    },

    /// Pixel width or height is zero.
    #[error("Pixel dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Supplied pixel width.
        width: u32,
        /// Supplied pixel height.
        height: u32,
    },

    /// A required collection is empty.
    #[error("No {what} provided")]
    EmptyPayload {
        /// What was expected in the payload.
        what: &'static str,
    },

    /// Sharing assets without one wrapped key per asset.
    #[error("Expected {expected} asset keys, got {actual}")]
    KeyCountMismatch {
        /// Number of asset ids in the request.
        expected: usize,
        /// Number of wrapped keys in the request.
        actual: usize,
    },

    /// An identifier is not a valid UUID.
    #[error("Invalid UUID string for {field}: {value}")]
    InvalidUuid {
        /// Which identifier was malformed.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl ValidationError {
    /// Create an empty payload error.
    ///
    /// # Arguments
    /// * `what` - Description of the missing data
    pub fn empty(what: &'static str) -> Self {
        Self::EmptyPayload { what }
    }
}
