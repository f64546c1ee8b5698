//! Error types for the AWS SDK storage backend.

use photoshare_storage::StorageError;
use thiserror::Error;

/// Errors specific to the AWS SDK backend.
#[derive(Error, Debug)]
pub enum S3Error {
    /// AWS SDK error.
    #[error("AWS SDK error: {message}")]
    SdkError { message: String, retryable: bool },

    /// STS rejected or failed the identity exchange.
    #[error("STS error: {0}")]
    StsError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<S3Error> for StorageError {
    fn from(err: S3Error) -> Self {
        match err {
            S3Error::SdkError { message, retryable } => {
                StorageError::NetworkError { message, retryable }
            }
            S3Error::StsError(message) => StorageError::FederationFailed { message },
            S3Error::ConfigError(message) => StorageError::InvalidConfig { message },
        }
    }
}
