//! Shared data structures for storage configuration.

/// Configuration settings for storage clients.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// AWS region.
    pub region: String,
    /// Custom endpoint (S3-compatible servers); forces path-style addressing.
    pub endpoint: Option<String>,
    /// Static service-wide credentials. When set, every request shares one client.
    pub credentials: Option<AwsCredentials>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            region: "us-east-1".into(),
            endpoint: None,
            credentials: None,
        }
    }
}

impl StorageSettings {
    /// Set the region.
    ///
    /// # Arguments
    /// * `region` - AWS region name
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set a custom endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - Endpoint URL of an S3-compatible server
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set static credentials.
    ///
    /// # Arguments
    /// * `credentials` - Service-wide credentials
    pub fn with_credentials(mut self, credentials: AwsCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Whether path-style addressing must be used.
    pub fn force_path_style(&self) -> bool {
        self.endpoint.is_some()
    }
}

/// AWS credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Create credentials.
    ///
    /// # Arguments
    /// * `access_key_id` - Access key id
    /// * `secret_access_key` - Secret access key
    /// * `session_token` - Session token for temporary credentials
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }
}
