//! Storage abstraction for photoshare asset objects.
//!
//! Every asset is stored as two objects: a reduced ("low") representation and
//! the original. Both live in the same bucket under keys that differ only by
//! a marker (`_low` vs `_original`). This crate provides a backend-agnostic
//! interface over the two object operations the service needs:
//!
//! - **Footprint** - HEAD both representations of an asset and report their lengths
//! - **Bulk delete** - remove a batch of objects, one bulk request per bucket
//!
//! Backends implement [`StorageClient`]; the AWS SDK implementation lives in
//! `photoshare-storage-s3`, and [`memory::MemoryStorageClient`] serves tests and
//! local development.

mod error;
mod locator;
pub mod memory;
mod objects;
mod traits;
mod types;

pub use error::StorageError;
pub use locator::{group_by_bucket, ObjectLocator};
pub use objects::{AssetObjects, RepresentationSizes};
pub use traits::{StorageClient, StorageFederation};
pub use types::{AwsCredentials, StorageSettings};
