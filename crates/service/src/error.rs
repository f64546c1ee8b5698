//! Service error taxonomy.

use std::time::Duration;

use photoshare_common::ValidationError;
use photoshare_identity::IdentityError;
use photoshare_metadata::MetadataError;
use photoshare_storage::StorageError;
use thiserror::Error;

/// Outcome class of an error, for mapping onto a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The caller sent something invalid.
    ClientFault,
    /// The caller is not authenticated.
    Unauthorized,
    /// The query legitimately found nothing.
    NoContent,
    /// A downstream dependency failed.
    ServerFault,
    /// The request deadline passed.
    Timeout,
    /// The operation is not available in this deployment.
    NotImplemented,
}

/// Errors reported by service operations.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// Caller-supplied data violates a precondition.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Nothing found.
    #[error("no data")]
    NoData,

    /// Object storage failed.
    #[error("Storage error: {0}")]
    Storage(StorageError),

    /// Object storage reported a length that cannot be valid.
    #[error("Invalid object length: {0}")]
    InvalidLength(StorageError),

    /// Metadata store failed.
    #[error("Persistence error: {0}")]
    Persistence(MetadataError),

    /// Exchanging the caller's credential for storage credentials failed.
    #[error("Credential exchange failed: {0}")]
    AuthExchange(String),

    /// The request carried no bearer credential.
    #[error("Missing bearer credential")]
    MissingCredential,

    /// The bearer credential was rejected.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// The identity provider could not be used.
    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    /// The request deadline passed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The operation needs a collaborator this deployment lacks.
    #[error("{0} is not available")]
    NotImplemented(&'static str),

    /// The service stopped accepting requests.
    #[error("Service is shutting down")]
    ShuttingDown,
}

impl ServiceError {
    /// Outcome class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            ServiceError::Validation(_) => ErrorClass::ClientFault,
            ServiceError::MissingCredential | ServiceError::Unauthenticated(_) => {
                ErrorClass::Unauthorized
            }
            ServiceError::NoData => ErrorClass::NoContent,
            ServiceError::Storage(_)
            | ServiceError::InvalidLength(_)
            | ServiceError::Persistence(_)
            | ServiceError::AuthExchange(_)
            | ServiceError::IdentityProvider(_)
            | ServiceError::ShuttingDown => ErrorClass::ServerFault,
            ServiceError::Timeout(_) => ErrorClass::Timeout,
            ServiceError::NotImplemented(_) => ErrorClass::NotImplemented,
        }
    }

    /// Whether this is a downstream fault that must be logged with detail.
    pub fn is_server_fault(&self) -> bool {
        self.class() == ErrorClass::ServerFault
    }

    /// Message safe to return to the caller.
    ///
    /// Server faults never expose internal detail.
    pub fn public_message(&self) -> String {
        match self.class() {
            ErrorClass::ServerFault => "internal server error".to_string(),
            ErrorClass::Unauthorized => "unauthorized".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidLength { .. } => ServiceError::InvalidLength(err),
            StorageError::FederationFailed { message } => ServiceError::AuthExchange(message),
            other => ServiceError::Storage(other),
        }
    }
}

impl From<MetadataError> for ServiceError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::NoData => ServiceError::NoData,
            other => ServiceError::Persistence(other),
        }
    }
}

impl From<IdentityError> for ServiceError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::MissingCredential => ServiceError::MissingCredential,
            IdentityError::InvalidToken(reason) => ServiceError::Unauthenticated(reason),
            IdentityError::VerifierUnavailable(message) | IdentityError::ClaimFailed(message) => {
                ServiceError::IdentityProvider(message)
            }
        }
    }
}
