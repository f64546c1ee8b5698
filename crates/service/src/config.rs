//! Service configuration.
//!
//! Everything is read once at startup; the resulting [`ServiceConfig`] is
//! immutable for the life of the process.

use std::path::PathBuf;
use std::time::Duration;

use photoshare_notify::OneSignalSettings;
use photoshare_storage::{AwsCredentials, StorageSettings};
use photoshare_storage_s3::FederationSettings;
use thiserror::Error;

pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PHOTOSHARE_REQUEST_TIMEOUT_SECS";
pub const ENV_MAX_CONCURRENT_REQUESTS: &str = "PHOTOSHARE_MAX_CONCURRENT_REQUESTS";
pub const ENV_DATABASE_PATH: &str = "PHOTOSHARE_DATABASE_PATH";
pub const ENV_AWS_REGION: &str = "AWS_REGION";
pub const ENV_AWS_ENDPOINT: &str = "AWS_ENDPOINT";
pub const ENV_STORAGE_ACCESS_KEY_ID: &str = "PHOTOSHARE_STORAGE_ACCESS_KEY_ID";
pub const ENV_STORAGE_SECRET_ACCESS_KEY: &str = "PHOTOSHARE_STORAGE_SECRET_ACCESS_KEY";
pub const ENV_STORAGE_SESSION_TOKEN: &str = "PHOTOSHARE_STORAGE_SESSION_TOKEN";
pub const ENV_FEDERATION_ROLE_ARN: &str = "PHOTOSHARE_FEDERATION_ROLE_ARN";
pub const ENV_FEDERATION_SESSION_NAME: &str = "PHOTOSHARE_FEDERATION_SESSION_NAME";
pub const ENV_ONESIGNAL_APP_ID: &str = "ONESIGNAL_APPID";
pub const ENV_ONESIGNAL_API_KEY: &str = "ONESIGNAL_APIKEY";

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of requests handled concurrently.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

/// Default metadata database file.
pub const DEFAULT_DATABASE_PATH: &str = "photoshare.db";

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be used.
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Process-wide service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Deadline for handling one request.
    pub request_timeout: Duration,
    /// Maximum number of requests handled at once.
    pub max_concurrent_requests: usize,
    /// SQLite metadata database path.
    pub database_path: PathBuf,
    /// Object store settings. Static credentials select the shared backend mode.
    pub storage: StorageSettings,
    /// Role assumed when exchanging caller tokens.
    pub federation: FederationSettings,
    /// Push provider; `None` disables notifications.
    pub notifications: Option<OneSignalSettings>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            storage: StorageSettings::default(),
            federation: FederationSettings::default(),
            notifications: None,
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through a variable lookup function.
    ///
    /// Unset and empty variables fall back to defaults.
    ///
    /// # Errors
    /// `InvalidValue` when a numeric variable does not parse or is zero, or
    /// when only one half of a credential or OneSignal pair is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config: ServiceConfig = ServiceConfig::default();

        if let Some(value) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = parse_positive(ENV_REQUEST_TIMEOUT_SECS, &value)?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(value) = get(ENV_MAX_CONCURRENT_REQUESTS) {
            config.max_concurrent_requests =
                parse_positive(ENV_MAX_CONCURRENT_REQUESTS, &value)? as usize;
        }
        if let Some(path) = get(ENV_DATABASE_PATH) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(region) = get(ENV_AWS_REGION) {
            config.storage = config.storage.with_region(region);
        }
        if let Some(endpoint) = get(ENV_AWS_ENDPOINT) {
            config.storage = config.storage.with_endpoint(endpoint);
        }
        match (
            get(ENV_STORAGE_ACCESS_KEY_ID),
            get(ENV_STORAGE_SECRET_ACCESS_KEY),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => {
                let credentials: AwsCredentials = AwsCredentials::new(
                    access_key_id,
                    secret_access_key,
                    get(ENV_STORAGE_SESSION_TOKEN),
                );
                config.storage = config.storage.with_credentials(credentials);
            }
            (None, None) => {}
            (Some(_), None) => return Err(missing_pair(ENV_STORAGE_SECRET_ACCESS_KEY)),
            (None, Some(_)) => return Err(missing_pair(ENV_STORAGE_ACCESS_KEY_ID)),
        }

        if let Some(role_arn) = get(ENV_FEDERATION_ROLE_ARN) {
            config.federation = config.federation.with_role_arn(role_arn);
        }
        if let Some(session_name) = get(ENV_FEDERATION_SESSION_NAME) {
            config.federation = config.federation.with_session_name(session_name);
        }

        config.notifications = match (get(ENV_ONESIGNAL_APP_ID), get(ENV_ONESIGNAL_API_KEY)) {
            (Some(app_id), Some(api_key)) => Some(OneSignalSettings::new(app_id, api_key)),
            (None, None) => None,
            (Some(_), None) => return Err(missing_pair(ENV_ONESIGNAL_API_KEY)),
            (None, Some(_)) => return Err(missing_pair(ENV_ONESIGNAL_APP_ID)),
        };

        Ok(config)
    }

    /// Set the per-request deadline.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Set the concurrency limit.
    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    /// Set the metadata database path.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Set object store settings.
    pub fn with_storage(mut self, storage: StorageSettings) -> Self {
        self.storage = storage;
        self
    }

    /// Set the push provider.
    pub fn with_notifications(mut self, notifications: OneSignalSettings) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Whether a single shared storage identity serves every caller.
    pub fn uses_shared_storage(&self) -> bool {
        self.storage.credentials.is_some()
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    let parsed: u64 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: e.to_string(),
        })?;
    if parsed == 0 {
        return Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}

fn missing_pair(name: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: String::new(),
        reason: "must be set together with its pair".to_string(),
    }
}
