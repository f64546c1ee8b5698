//! Identity error types.

use thiserror::Error;

/// Errors that can occur while establishing caller identity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No usable bearer token on the request.
    #[error("Missing bearer credential")]
    MissingCredential,

    /// The token was rejected by the verifier.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The verifier itself could not be reached or failed.
    #[error("Identity verification failed: {0}")]
    VerifierUnavailable(String),

    /// Granting a storage claim failed.
    #[error("Claim grant failed: {0}")]
    ClaimFailed(String),
}
