//! Storage backend resolution per request.
//!
//! A deployment either pins one shared storage identity for every caller, or
//! federates: each request's bearer token is exchanged for temporary
//! credentials and a client scoped to them.

use std::sync::Arc;

use photoshare_identity::RequestContext;
use photoshare_storage::{StorageClient, StorageError, StorageFederation};

use crate::error::ServiceError;

enum BackendSource {
    Shared(Arc<dyn StorageClient>),
    Federated(Arc<dyn StorageFederation>),
}

/// Yields the storage backend a request must use for all of its steps.
pub struct CredentialBroker {
    source: BackendSource,
}

impl CredentialBroker {
    /// Serve every request from one service-wide client.
    pub fn shared(client: Arc<dyn StorageClient>) -> Self {
        Self {
            source: BackendSource::Shared(client),
        }
    }

    /// Exchange each caller's token for a scoped client.
    pub fn federated(federation: Arc<dyn StorageFederation>) -> Self {
        Self {
            source: BackendSource::Federated(federation),
        }
    }

    /// Whether the shared backend mode is active.
    pub fn is_shared(&self) -> bool {
        matches!(self.source, BackendSource::Shared(_))
    }

    /// Resolve the backend for one request.
    ///
    /// In shared mode the caller's credential is ignored.
    ///
    /// # Errors
    /// - `MissingCredential` if federation is needed and the request has no token
    /// - `AuthExchange` if the federation exchange fails
    pub async fn resolve(&self, ctx: &RequestContext) -> Result<Arc<dyn StorageClient>, ServiceError> {
        match &self.source {
            BackendSource::Shared(client) => Ok(Arc::clone(client)),
            BackendSource::Federated(federation) => {
                let token: &str = ctx
                    .bearer_token
                    .as_deref()
                    .ok_or(ServiceError::MissingCredential)?;
                federation.client_for_token(token).await.map_err(|e| match e {
                    StorageError::FederationFailed { message } => ServiceError::AuthExchange(message),
                    other => ServiceError::AuthExchange(other.to_string()),
                })
            }
        }
    }
}
