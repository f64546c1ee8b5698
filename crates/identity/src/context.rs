//! Per-request caller context.

use photoshare_common::IdentityHasher;
use photoshare_model::HashedContacts;

use crate::bearer::bearer_token;
use crate::error::IdentityError;
use crate::verifier::{IdentityVerifier, VerifiedIdentity};

/// Verified caller of one request.
///
/// Passed explicitly to every coordinator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Identity-provider subject.
    pub subject: String,
    /// Raw bearer token, kept for storage federation.
    pub bearer_token: Option<String>,
    /// Hashed contact identifiers of the caller.
    pub contacts: HashedContacts,
}

impl RequestContext {
    /// Context for a subject with no token and no contacts.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            bearer_token: None,
            contacts: HashedContacts::default(),
        }
    }

    /// Set the raw bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set the hashed contact identifiers.
    pub fn with_contacts(mut self, contacts: HashedContacts) -> Self {
        self.contacts = contacts;
        self
    }

    /// Build a context from a verified identity.
    ///
    /// # Arguments
    /// * `identity` - Verifier result
    /// * `token` - The raw token that was verified
    /// * `hasher` - Hasher applied to every provider identity
    pub fn from_verified(identity: VerifiedIdentity, token: &str, hasher: &IdentityHasher) -> Self {
        let contacts: HashedContacts = identity.identities.hashed(hasher);
        Self {
            subject: identity.subject,
            bearer_token: Some(token.to_string()),
            contacts,
        }
    }
}

/// Authenticate a request from its `Authorization` header.
///
/// # Arguments
/// * `verifier` - Token verifier
/// * `authorization` - Header value, if the request carried one
///
/// # Errors
/// `MissingCredential` when there is no bearer token, otherwise whatever the
/// verifier reports.
pub async fn authenticate(
    verifier: &dyn IdentityVerifier,
    authorization: Option<&str>,
) -> Result<RequestContext, IdentityError> {
    let token: &str = authorization
        .and_then(bearer_token)
        .ok_or(IdentityError::MissingCredential)?;
    let identity: VerifiedIdentity = verifier.verify(token).await?;
    Ok(RequestContext::from_verified(
        identity,
        token,
        &IdentityHasher::new(),
    ))
}
