//! STS web-identity federation.
//!
//! Trades a caller's OIDC token for temporary credentials bound to a fixed
//! role, then builds a storage client that can only do what that role allows.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use aws_sdk_sts::Client as StsClient;

use photoshare_storage::{
    AwsCredentials, StorageClient, StorageError, StorageFederation, StorageSettings,
};

use crate::client::S3StorageClient;
use crate::error::S3Error;

/// Role assumed when no role is configured.
pub const DEFAULT_ROLE_ARN: &str = "arn:aws:iam::123456789012:role/FederatedWebIdentityRole";

/// Session name recorded by STS when none is configured.
pub const DEFAULT_SESSION_NAME: &str = "photoshare";

/// Settings for the web-identity exchange.
#[derive(Debug, Clone)]
pub struct FederationSettings {
    /// Role assumed on behalf of callers.
    pub role_arn: String,
    /// Session name recorded in the assumed-role session.
    pub session_name: String,
    /// Requested credential lifetime; STS default when None.
    pub duration_seconds: Option<i32>,
}

impl Default for FederationSettings {
    fn default() -> Self {
        Self {
            role_arn: DEFAULT_ROLE_ARN.to_string(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
            duration_seconds: None,
        }
    }
}

impl FederationSettings {
    /// Set the role to assume.
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = role_arn.into();
        self
    }

    /// Set the session name.
    pub fn with_session_name(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = session_name.into();
        self
    }
}

/// `StorageFederation` backed by STS `AssumeRoleWithWebIdentity`.
pub struct StsFederation {
    /// STS client; unauthenticated calls are sufficient for web identity.
    sts_client: StsClient,
    /// SDK configuration shared with the per-caller S3 clients.
    sdk_config: SdkConfig,
    /// Storage settings applied to per-caller clients.
    storage: StorageSettings,
    /// Exchange settings.
    federation: FederationSettings,
}

impl StsFederation {
    /// Create a federation client.
    ///
    /// # Arguments
    /// * `storage` - Storage settings; the endpoint is used for STS as well
    /// * `federation` - Role and session settings
    pub async fn new(storage: StorageSettings, federation: FederationSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(storage.region.clone()));
        if let Some(ref endpoint) = storage.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config: SdkConfig = loader.load().await;

        Self {
            sts_client: StsClient::new(&sdk_config),
            sdk_config,
            storage,
            federation,
        }
    }

    /// Exchange a web identity token for temporary credentials.
    ///
    /// # Arguments
    /// * `web_identity_token` - Raw OIDC token presented by the caller
    pub async fn exchange(&self, web_identity_token: &str) -> Result<AwsCredentials, S3Error> {
        let output = self
            .sts_client
            .assume_role_with_web_identity()
            .role_arn(&self.federation.role_arn)
            .role_session_name(&self.federation.session_name)
            .web_identity_token(web_identity_token)
            .set_duration_seconds(self.federation.duration_seconds)
            .send()
            .await
            .map_err(|err| S3Error::StsError(err.into_service_error().to_string()))?;

        let credentials = output
            .credentials()
            .ok_or_else(|| S3Error::StsError("response carried no credentials".to_string()))?;

        Ok(AwsCredentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            Some(credentials.session_token().to_string()),
        ))
    }
}

#[async_trait]
impl StorageFederation for StsFederation {
    async fn client_for_token(
        &self,
        web_identity_token: &str,
    ) -> Result<Arc<dyn StorageClient>, StorageError> {
        let credentials: AwsCredentials = self.exchange(web_identity_token).await?;
        log::debug!("Assumed role {} for storage access", self.federation.role_arn);

        let client: S3StorageClient =
            S3StorageClient::from_sdk_config(&self.sdk_config, &self.storage, Some(&credentials));
        Ok(Arc::new(client))
    }
}
