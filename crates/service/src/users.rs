//! User registration and lookup.

use std::sync::Arc;

use photoshare_common::{require_non_empty, require_uuid, ValidationError, USER_SCHEMA_VERSION};
use photoshare_identity::{ClaimIssuer, RequestContext};
use photoshare_metadata::MetadataStore;
use photoshare_model::{ContactResolution, NewUser, UserRecord};
use uuid::Uuid;

use crate::error::ServiceError;

/// User accounts bound to identity-provider subjects.
pub struct UserDirectory {
    metadata: Arc<dyn MetadataStore>,
    claims: Option<Arc<dyn ClaimIssuer>>,
}

impl UserDirectory {
    /// Create a directory without a claim issuer.
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self {
            metadata,
            claims: None,
        }
    }

    /// Enable direct storage claims.
    pub fn with_claim_issuer(mut self, claims: Arc<dyn ClaimIssuer>) -> Self {
        self.claims = Some(claims);
        self
    }

    /// Register the caller.
    ///
    /// # Arguments
    /// * `ctx` - Verified caller; its hashed contacts are stored
    /// * `public_key` - Plain public key
    /// * `private_key` - Private key encrypted by the client
    ///
    /// # Returns
    /// The generated user id.
    pub async fn register_user(
        &self,
        ctx: &RequestContext,
        public_key: &str,
        private_key: &str,
    ) -> Result<String, ServiceError> {
        require_non_empty(&[public_key, private_key])?;

        let user: NewUser = NewUser {
            subject: ctx.subject.clone(),
            user_id: Uuid::new_v4().to_string(),
            contacts: ctx.contacts.clone(),
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
            schema_version: USER_SCHEMA_VERSION.to_string(),
        };
        self.metadata.create_user(&user).await?;
        tracing::info!(user_id = %user.user_id, "registered user");
        Ok(user.user_id)
    }

    /// The caller's own record.
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<UserRecord, ServiceError> {
        Ok(self.metadata.get_user(&ctx.subject).await?)
    }

    /// Replace the caller's stored contacts with those of the current token.
    pub async fn update_contact(&self, ctx: &RequestContext) -> Result<(), ServiceError> {
        self.metadata
            .update_user_contact(&ctx.subject, &ctx.contacts)
            .await?;
        Ok(())
    }

    /// Public key of a user.
    pub async fn public_key(&self, user_id: &str) -> Result<String, ServiceError> {
        require_uuid("user id", user_id)?;
        let mut resolution: ContactResolution = self
            .metadata
            .get_public_info_for_users(&[user_id.to_string()], &[], &[])
            .await?;
        resolution
            .existing
            .remove(user_id)
            .ok_or(ServiceError::NoData)
    }

    /// The subset of `ids` naming registered users.
    pub async fn verify_identifiers(&self, ids: &[String]) -> Result<Vec<String>, ServiceError> {
        if ids.is_empty() {
            return Err(ValidationError::empty("user ids").into());
        }
        Ok(self.metadata.verify_identifiers(ids).await?)
    }

    /// Grant the caller direct object-store credentials.
    ///
    /// # Errors
    /// `NotImplemented` when no claim issuer is configured.
    pub async fn grant_storage_claim(&self, ctx: &RequestContext) -> Result<(), ServiceError> {
        let claims: &Arc<dyn ClaimIssuer> = self
            .claims
            .as_ref()
            .ok_or(ServiceError::NotImplemented("storage claims"))?;
        claims.grant_storage_claim(&ctx.subject).await?;
        Ok(())
    }
}
