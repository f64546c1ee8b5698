//! AWS SDK S3 backend for photoshare storage.
//!
//! This crate provides a `StorageClient` implementation using the AWS SDK for
//! Rust, and an STS-based `StorageFederation` that trades a caller's OIDC
//! token for temporary credentials via `AssumeRoleWithWebIdentity`.
//!
//! # Example
//!
//! ```ignore
//! use photoshare_storage::StorageSettings;
//! use photoshare_storage_s3::{FederationSettings, S3StorageClient, StsFederation};
//!
//! // Service-wide client with static credentials
//! let client = S3StorageClient::new(&settings).await?;
//!
//! // Per-caller clients via federation
//! let federation = StsFederation::new(settings, FederationSettings::default()).await;
//! let scoped = federation.client_for_token(raw_token).await?;
//! ```

mod client;
mod error;
mod federation;

pub use client::{S3StorageClient, MAX_KEYS_PER_DELETE};
pub use error::S3Error;
pub use federation::{FederationSettings, StsFederation, DEFAULT_ROLE_ARN, DEFAULT_SESSION_NAME};
