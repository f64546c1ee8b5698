//! Contact discovery over hashed identifiers.

use std::sync::Arc;

use photoshare_metadata::MetadataStore;
use photoshare_model::ContactResolution;

use crate::error::ServiceError;

/// Matches hashed contacts against registered users.
pub struct ContactMatcher {
    metadata: Arc<dyn MetadataStore>,
}

impl ContactMatcher {
    /// Create a matcher over a metadata store.
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self { metadata }
    }

    /// Resolve user ids, phone digests and email digests to users.
    ///
    /// A user found through several identifier spaces appears once in
    /// `existing`. Identifiers that matched nobody are returned in `unmatched`.
    ///
    /// # Errors
    /// `NoData` when nothing matched, including when all three lists are empty.
    pub async fn resolve(
        &self,
        ids: &[String],
        phone_digests: &[String],
        email_digests: &[String],
    ) -> Result<ContactResolution, ServiceError> {
        if ids.is_empty() && phone_digests.is_empty() && email_digests.is_empty() {
            return Err(ServiceError::NoData);
        }
        let resolution: ContactResolution = self
            .metadata
            .get_public_info_for_users(ids, phone_digests, email_digests)
            .await?;
        if resolution.has_no_matches() {
            return Err(ServiceError::NoData);
        }
        Ok(resolution)
    }
}
