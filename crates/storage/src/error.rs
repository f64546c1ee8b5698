//! Error types for storage operations.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// Object not found in the bucket.
    #[error("Object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The backend reported a negative content length.
    #[error("Invalid content length {length} for s3://{bucket}/{key}")]
    InvalidLength {
        bucket: String,
        key: String,
        length: i64,
    },

    /// A locator could not be decomposed into bucket and key.
    #[error("Invalid storage locator {locator}: {reason}")]
    InvalidLocator { locator: String, reason: String },

    /// Access denied.
    #[error("Access denied to s3://{bucket}: {message}")]
    AccessDenied { bucket: String, message: String },

    /// Network error.
    #[error("Network error: {message}")]
    NetworkError { message: String, retryable: bool },

    /// Exchanging an identity token for storage credentials failed.
    #[error("Credential federation failed: {message}")]
    FederationFailed { message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl StorageError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageError::NetworkError { retryable, .. } => *retryable,
            StorageError::NotFound { .. } => false,
            StorageError::InvalidLength { .. } => false,
            StorageError::InvalidLocator { .. } => false,
            StorageError::AccessDenied { .. } => false,
            StorageError::FederationFailed { .. } => false,
            StorageError::InvalidConfig { .. } => false,
            StorageError::Other { .. } => false,
        }
    }

    /// Create an invalid locator error.
    ///
    /// # Arguments
    /// * `locator` - The rejected locator
    /// * `reason` - Why it was rejected
    pub fn invalid_locator(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        StorageError::InvalidLocator {
            locator: locator.into(),
            reason: reason.into(),
        }
    }
}
