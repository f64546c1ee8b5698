//! AWS SDK S3 client implementation.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client as S3Client;

use photoshare_storage::{AwsCredentials, StorageClient, StorageError, StorageSettings};

/// Upper bound on keys accepted by one S3 DeleteObjects request.
pub const MAX_KEYS_PER_DELETE: usize = 1000;

/// Provider name attached to static and federated credentials.
const CREDENTIALS_PROVIDER_NAME: &str = "photoshare";

/// StorageClient implementation using AWS SDK for Rust.
pub struct S3StorageClient {
    /// The underlying S3 client.
    s3_client: S3Client,
}

impl S3StorageClient {
    /// Create a client from settings, using the settings' static credentials
    /// or the default credential chain.
    ///
    /// # Arguments
    /// * `settings` - Storage settings including region, endpoint and optional credentials
    pub async fn new(settings: &StorageSettings) -> Result<Self, StorageError> {
        let sdk_config: SdkConfig = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;
        Ok(Self::from_sdk_config(
            &sdk_config,
            settings,
            settings.credentials.as_ref(),
        ))
    }

    /// Create a client from an already loaded SDK configuration.
    ///
    /// # Arguments
    /// * `sdk_config` - Shared SDK configuration
    /// * `settings` - Storage settings (endpoint and addressing style are applied)
    /// * `credentials` - Credentials overriding the configuration's provider
    pub fn from_sdk_config(
        sdk_config: &SdkConfig,
        settings: &StorageSettings,
        credentials: Option<&AwsCredentials>,
    ) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config)
            .region(Region::new(settings.region.clone()))
            .force_path_style(settings.force_path_style());

        if let Some(ref endpoint) = settings.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        if let Some(creds) = credentials {
            builder = builder.credentials_provider(Credentials::new(
                &creds.access_key_id,
                &creds.secret_access_key,
                creds.session_token.clone(),
                None,
                CREDENTIALS_PROVIDER_NAME,
            ));
        }

        Self {
            s3_client: S3Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl StorageClient for S3StorageClient {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<Option<i64>, StorageError> {
        let request = self.s3_client.head_object().bucket(bucket).key(key);

        match request.send().await {
            Ok(output) => match output.content_length() {
                Some(length) => Ok(Some(length)),
                None => Err(StorageError::Other {
                    message: format!("HEAD s3://{}/{} returned no content length", bucket, key),
                }),
            },
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(None)
                } else {
                    Err(StorageError::NetworkError {
                        message: service_err.to_string(),
                        retryable: false,
                    })
                }
            }
        }
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        for chunk in keys.chunks(MAX_KEYS_PER_DELETE) {
            let objects: Vec<ObjectIdentifier> = chunk
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<_, _>>()
                .map_err(|e| StorageError::Other {
                    message: e.to_string(),
                })?;

            let delete: Delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|e| StorageError::Other {
                    message: e.to_string(),
                })?;

            let output = self
                .s3_client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|err| {
                    let service_err = err.into_service_error();
                    if service_err.code() == Some("AccessDenied") {
                        StorageError::AccessDenied {
                            bucket: bucket.to_string(),
                            message: service_err.to_string(),
                        }
                    } else {
                        StorageError::NetworkError {
                            message: service_err.to_string(),
                            retryable: true,
                        }
                    }
                })?;

            // Quiet mode only reports the keys that failed.
            let failed = output.errors();
            if let Some(first) = failed.first() {
                log::warn!(
                    "Bulk delete in bucket {} left {} objects behind",
                    bucket,
                    failed.len()
                );
                return Err(StorageError::Other {
                    message: format!(
                        "failed to delete {} objects from {} (first: {}: {})",
                        failed.len(),
                        bucket,
                        first.key().unwrap_or_default(),
                        first.message().unwrap_or_default()
                    ),
                });
            }
        }

        Ok(())
    }
}
