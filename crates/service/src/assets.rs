//! Asset lifecycle: create, patch and delete.
//!
//! Metadata and stored objects are two independent systems and nothing here
//! spans them transactionally:
//!
//! - creation probes storage first and persists metadata last, so a failed
//!   probe leaves no record behind;
//! - deletion removes metadata first and objects second, so a storage failure
//!   can leave orphaned objects that no record points to;
//! - batches run sequentially and stop at the first failure, keeping whatever
//!   was committed before it.

use std::collections::HashMap;
use std::sync::Arc;

use photoshare_common::{require_dimensions, require_non_empty, ValidationError};
use photoshare_metadata::MetadataStore;
use photoshare_model::{
    total_billable_size, AssetRecord, GroupAlbum, NewAsset, SizeMap,
};
use photoshare_storage::{AssetObjects, RepresentationSizes, StorageClient};

use crate::error::ServiceError;

/// Coordinates asset metadata with the objects backing it.
pub struct AssetLifecycleCoordinator {
    metadata: Arc<dyn MetadataStore>,
}

impl AssetLifecycleCoordinator {
    /// Create a coordinator over a metadata store.
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self { metadata }
    }

    /// Billable size of an asset from its original-representation locator.
    async fn billable_size(
        &self,
        storage: &dyn StorageClient,
        original_locator: &str,
    ) -> Result<u64, ServiceError> {
        let sizes: RepresentationSizes = AssetObjects::new(storage).filesizes(original_locator).await?;
        Ok(total_billable_size(sizes.original, sizes.low))
    }

    /// Create one asset.
    ///
    /// # Arguments
    /// * `subject` - Owner
    /// * `asset` - Caller-supplied fields
    /// * `storage` - Backend resolved for this request
    ///
    /// # Returns
    /// The billable size when an original-representation path was supplied.
    ///
    /// # Errors
    /// `Validation` before any backend call when the id, path or key is empty
    /// or a pixel dimension is zero; `Storage`/`InvalidLength` when probing
    /// fails; `Persistence` when the record cannot be written.
    pub async fn create_asset(
        &self,
        subject: &str,
        asset: &NewAsset,
        storage: &dyn StorageClient,
    ) -> Result<Option<u64>, ServiceError> {
        require_non_empty(&[
            asset.asset_id.as_str(),
            asset.remote_path.as_str(),
            asset.key.as_str(),
        ])?;
        require_dimensions(asset.pixel_width, asset.pixel_height)?;

        let total_size: Option<u64> = match asset.original_locator() {
            Some(path) => Some(self.billable_size(storage, path).await?),
            None => None,
        };

        self.metadata
            .create_asset(subject, asset, total_size)
            .await?;
        tracing::debug!(asset_id = %asset.asset_id, ?total_size, "created asset");
        Ok(total_size)
    }

    /// Create several assets in order, stopping at the first failure.
    ///
    /// Assets created before the failing one stay committed.
    ///
    /// # Returns
    /// Billable sizes of the created assets that carried an original path.
    pub async fn create_many(
        &self,
        subject: &str,
        assets: &[NewAsset],
        storage: &dyn StorageClient,
    ) -> Result<SizeMap, ServiceError> {
        let mut sizes: SizeMap = SizeMap::new();
        for asset in assets {
            if let Some(size) = self.create_asset(subject, asset, storage).await? {
                sizes.insert(asset.asset_id.clone(), size);
            }
        }
        Ok(sizes)
    }

    /// Delete assets and then the objects they referenced.
    ///
    /// # Errors
    /// Metadata failures abort before storage is touched. A storage failure is
    /// reported after the records are already gone.
    pub async fn delete_assets(
        &self,
        subject: &str,
        asset_ids: &[String],
        storage: &dyn StorageClient,
    ) -> Result<(), ServiceError> {
        if asset_ids.is_empty() {
            return Err(ValidationError::empty("asset ids").into());
        }

        let locators: Vec<String> = self.metadata.delete_assets(subject, asset_ids).await?;
        if locators.is_empty() {
            return Ok(());
        }

        if let Err(e) = AssetObjects::new(storage).delete(&locators).await {
            tracing::error!(
                subject,
                objects = locators.len(),
                retryable = e.is_retryable(),
                "asset records deleted but objects remain: {}",
                e
            );
            return Err(e.into());
        }
        Ok(())
    }

    /// Create then delete, with the same backend.
    pub async fn patch_assets(
        &self,
        subject: &str,
        create: &[NewAsset],
        delete: &[String],
        storage: &dyn StorageClient,
    ) -> Result<SizeMap, ServiceError> {
        let sizes: SizeMap = self.create_many(subject, create, storage).await?;
        if !delete.is_empty() {
            self.delete_assets(subject, delete, storage).await?;
        }
        Ok(sizes)
    }

    /// Attach the original representation to an existing asset.
    ///
    /// # Returns
    /// The new billable size of the asset.
    pub async fn attach_original_path(
        &self,
        subject: &str,
        asset_id: &str,
        remote_path_orig: &str,
        storage: &dyn StorageClient,
    ) -> Result<u64, ServiceError> {
        require_non_empty(&[asset_id, remote_path_orig])?;

        let total_size: u64 = self.billable_size(storage, remote_path_orig).await?;
        self.metadata
            .add_path_for_original_asset(subject, asset_id, remote_path_orig, total_size)
            .await?;
        Ok(total_size)
    }

    /// Attach original representations in bulk: asset id → locator.
    ///
    /// Processed in asset id order; stops at the first failure.
    pub async fn attach_original_paths(
        &self,
        subject: &str,
        paths: &HashMap<String, String>,
        storage: &dyn StorageClient,
    ) -> Result<SizeMap, ServiceError> {
        if paths.is_empty() {
            return Err(ValidationError::empty("original paths").into());
        }

        let mut ordered: Vec<(&String, &String)> = paths.iter().collect();
        ordered.sort();

        let mut sizes: SizeMap = SizeMap::with_capacity(paths.len());
        for (asset_id, path) in ordered {
            let size: u64 = self
                .attach_original_path(subject, asset_id, path, storage)
                .await?;
            sizes.insert(asset_id.clone(), size);
        }
        Ok(sizes)
    }

    /// Overwrite the original filename of one asset. An empty filename
    /// clears it.
    pub async fn set_original_filename(
        &self,
        subject: &str,
        asset_id: &str,
        filename: &str,
    ) -> Result<(), ServiceError> {
        require_non_empty(&[asset_id])?;
        let filenames: HashMap<String, String> =
            HashMap::from([(asset_id.to_string(), filename.to_string())]);
        self.metadata
            .set_original_filenames(subject, &filenames)
            .await?;
        Ok(())
    }

    /// Overwrite original filenames in bulk: asset id → filename.
    pub async fn set_original_filenames(
        &self,
        subject: &str,
        filenames: &HashMap<String, String>,
    ) -> Result<(), ServiceError> {
        if filenames.is_empty() {
            return Err(ValidationError::empty("filenames").into());
        }
        self.metadata
            .set_original_filenames(subject, filenames)
            .await?;
        Ok(())
    }

    /// The caller's assets.
    pub async fn assets(&self, subject: &str) -> Result<HashMap<String, AssetRecord>, ServiceError> {
        Ok(self.metadata.get_assets(subject).await?)
    }

    /// Album and shared assets of every group the caller has joined.
    pub async fn group_albums(
        &self,
        subject: &str,
    ) -> Result<HashMap<String, GroupAlbum>, ServiceError> {
        Ok(self.metadata.get_assets_for_all_groups(subject).await?)
    }
}
