//! Asset object operations over any `StorageClient`.
//!
//! Two operations, both driven by locators recorded in asset metadata:
//!
//! - `filesizes` HEADs the original representation and its derived low
//!   representation. Object content is never read.
//! - `delete` removes a batch of objects, grouped by bucket, with one bulk
//!   request per bucket. Buckets are processed in order and the first failure
//!   aborts the rest; buckets already processed stay deleted.

use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::locator::{group_by_bucket, ObjectLocator};
use crate::traits::StorageClient;

/// Byte lengths of both representations of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepresentationSizes {
    /// Length of the original representation.
    pub original: u64,
    /// Length of the low representation.
    pub low: u64,
}

/// Asset-level object operations bound to one storage client.
pub struct AssetObjects<'a> {
    /// The storage client for object operations.
    client: &'a dyn StorageClient,
}

impl<'a> AssetObjects<'a> {
    /// Create asset operations over a client.
    ///
    /// # Arguments
    /// * `client` - Storage client scoped to the current request
    pub fn new(client: &'a dyn StorageClient) -> Self {
        Self { client }
    }

    /// Measure both representations of an asset.
    ///
    /// # Arguments
    /// * `original_locator` - Locator of the original representation; the low
    ///   representation's key is derived from it
    ///
    /// # Errors
    /// - `InvalidLocator` if the locator cannot be parsed
    /// - `NotFound` if either object is absent
    /// - `InvalidLength` if the backend reports a negative length
    pub async fn filesizes(&self, original_locator: &str) -> Result<RepresentationSizes, StorageError> {
        let original: ObjectLocator = ObjectLocator::parse(original_locator)?;
        let low: ObjectLocator = original.low_representation();

        let original_length: u64 = self.probe(&original).await?;
        let low_length: u64 = self.probe(&low).await?;

        Ok(RepresentationSizes {
            original: original_length,
            low: low_length,
        })
    }

    /// Delete a batch of objects.
    ///
    /// # Arguments
    /// * `locators` - Locators of the objects to delete, in any buckets
    ///
    /// # Errors
    /// Fails before any request if a locator is malformed; otherwise fails on
    /// the first bucket whose bulk delete fails, leaving earlier buckets deleted.
    pub async fn delete<S: AsRef<str>>(&self, locators: &[S]) -> Result<(), StorageError> {
        let grouped: BTreeMap<String, Vec<String>> = group_by_bucket(locators)?;

        for (bucket, keys) in &grouped {
            log::debug!("Deleting {} objects from bucket {}", keys.len(), bucket);
            self.client.delete_objects(bucket, keys).await?;
        }

        Ok(())
    }

    /// HEAD one object and validate its reported length.
    async fn probe(&self, locator: &ObjectLocator) -> Result<u64, StorageError> {
        let length: i64 = self
            .client
            .head_object(&locator.bucket, &locator.key)
            .await?
            .ok_or_else(|| StorageError::NotFound {
                bucket: locator.bucket.clone(),
                key: locator.key.clone(),
            })?;

        u64::try_from(length).map_err(|_| StorageError::InvalidLength {
            bucket: locator.bucket.clone(),
            key: locator.key.clone(),
            length,
        })
    }
}
