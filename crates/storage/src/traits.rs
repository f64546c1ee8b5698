//! Storage traits/interfaces for object operations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageError;

/// Low-level object operations - implemented by each backend.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Check if an object exists and return its content length.
    ///
    /// Returns None if the object doesn't exist. The length is passed through
    /// as reported by the backend, unvalidated.
    async fn head_object(&self, bucket: &str, key: &str) -> Result<Option<i64>, StorageError>;

    /// Delete a batch of objects from one bucket in a single logical request.
    ///
    /// Missing keys are not an error. Any key the backend fails to delete
    /// fails the whole call.
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError>;
}

/// Exchanges a caller's identity token for a storage client whose
/// permissions are limited to what the exchanged credentials allow.
#[async_trait]
pub trait StorageFederation: Send + Sync {
    /// Exchange a web identity token for a scoped storage client.
    ///
    /// # Errors
    /// Returns `FederationFailed` if the exchange is rejected or fails.
    async fn client_for_token(
        &self,
        web_identity_token: &str,
    ) -> Result<Arc<dyn StorageClient>, StorageError>;
}
