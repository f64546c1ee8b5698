//! Wiring of production backends from configuration.

use std::sync::Arc;

use photoshare_identity::IdentityVerifier;
use photoshare_metadata::{MetadataError, SqliteMetadataStore};
use photoshare_notify::{NoopSink, NotificationSink, OneSignalSink};
use photoshare_storage::StorageError;
use photoshare_storage_s3::{S3StorageClient, StsFederation};
use thiserror::Error;

use crate::broker::CredentialBroker;
use crate::config::{ConfigError, ServiceConfig};
use crate::service::SharingService;

/// Errors raised while starting the service.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to open metadata store: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Failed to initialise object storage: {0}")]
    Storage(#[from] StorageError),
}

/// Build the service from configuration.
///
/// Opens the SQLite metadata store, selects the shared or federated storage
/// mode, and uses OneSignal when configured or a no-op sink otherwise.
///
/// # Arguments
/// * `config` - Process-wide configuration
/// * `verifier` - Bearer token verifier for the identity provider in use
pub async fn build_service(
    config: &ServiceConfig,
    verifier: Arc<dyn IdentityVerifier>,
) -> Result<SharingService, BootstrapError> {
    let metadata: Arc<SqliteMetadataStore> =
        Arc::new(SqliteMetadataStore::open(&config.database_path)?);

    let broker: CredentialBroker = if config.uses_shared_storage() {
        tracing::info!(region = %config.storage.region, "using shared storage credentials");
        CredentialBroker::shared(Arc::new(S3StorageClient::new(&config.storage).await?))
    } else {
        tracing::info!(role = %config.federation.role_arn, "using federated storage credentials");
        CredentialBroker::federated(Arc::new(
            StsFederation::new(config.storage.clone(), config.federation.clone()).await,
        ))
    };

    let notifications: Arc<dyn NotificationSink> = match &config.notifications {
        Some(settings) => Arc::new(OneSignalSink::new(settings.clone())),
        None => {
            tracing::warn!("no push provider configured; notifications are disabled");
            Arc::new(NoopSink)
        }
    };

    Ok(SharingService::new(
        config,
        metadata,
        broker,
        verifier,
        notifications,
    ))
}

/// Build the service from the process environment.
pub async fn build_service_from_env(
    verifier: Arc<dyn IdentityVerifier>,
) -> Result<SharingService, BootstrapError> {
    let config: ServiceConfig = ServiceConfig::from_env()?;
    build_service(&config, verifier).await
}
