//! Photoshare service.
//!
//! Keeps encrypted-asset metadata, object storage, group membership and
//! per-member key distribution consistent:
//!
//! - [`AssetLifecycleCoordinator`] creates, patches and deletes assets across
//!   the metadata store and object storage
//! - [`GroupSharingCoordinator`] manages membership and sharing edges and
//!   fans out notifications
//! - [`ContactMatcher`] discovers users from hashed contacts
//! - [`UserDirectory`] registers users and serves their public keys
//! - [`CredentialBroker`] yields the storage backend of each request
//!
//! [`SharingService`] fronts all of them with a per-request deadline and a
//! concurrency limit; [`build_service`] wires it to SQLite, S3/STS and
//! OneSignal from a [`ServiceConfig`].
//!
//! # Example
//!
//! ```ignore
//! let service = build_service_from_env(verifier).await?;
//! let ctx = service.authenticate(request.header("Authorization")).await?;
//! let size = service.create_asset(&ctx, &asset).await?;
//! ```

mod assets;
mod bootstrap;
mod broker;
pub mod config;
mod contacts;
mod error;
mod groups;
mod service;
mod users;

pub use assets::AssetLifecycleCoordinator;
pub use bootstrap::{build_service, build_service_from_env, BootstrapError};
pub use broker::CredentialBroker;
pub use config::{ConfigError, ServiceConfig};
pub use contacts::ContactMatcher;
pub use error::{ErrorClass, ServiceError};
pub use groups::{AlbumChange, GroupSharingCoordinator, SharingChange};
pub use service::SharingService;
pub use users::UserDirectory;
