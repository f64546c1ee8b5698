//! Seams to the external identity provider.

use async_trait::async_trait;

use crate::claims::ProviderIdentities;
use crate::error::IdentityError;

/// Result of a successful token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Stable subject identifier of the caller.
    pub subject: String,
    /// Contact identities the provider vouches for.
    pub identities: ProviderIdentities,
}

/// Validates bearer credentials.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a raw bearer token.
    ///
    /// # Errors
    /// `InvalidToken` when the token is rejected, `VerifierUnavailable` when
    /// verification could not be performed.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

/// Grants users direct federated credentials to the object store.
#[async_trait]
pub trait ClaimIssuer: Send + Sync {
    /// Attach the storage claim to the given subject.
    async fn grant_storage_claim(&self, subject: &str) -> Result<(), IdentityError>;
}
