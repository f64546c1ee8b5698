//! Asset records.

use photoshare_common::DEFAULT_ASSET_TYPE;
use serde::{Deserialize, Serialize};

/// Caller-supplied fields for creating an asset.
///
/// The asset size is never accepted from the caller; it is derived from the
/// stored representations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAsset {
    /// Asset id chosen by the client.
    pub asset_id: String,
    /// Type tag; empty means "photo".
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Locator of the low representation.
    pub remote_path: String,
    /// Locator of the original representation, when already uploaded.
    pub remote_path_orig: Option<String>,
    /// Capture timestamp.
    pub create_date: Option<String>,
    /// Capture location.
    pub location: Option<String>,
    /// Media duration.
    pub duration: Option<String>,
    /// Original filename.
    pub original_filename: Option<String>,
    /// Original uniform type identifier.
    pub original_uti: Option<String>,
    /// Pixel width; must be non-zero.
    pub pixel_width: u32,
    /// Pixel height; must be non-zero.
    pub pixel_height: u32,
    /// Integrity digest of the content.
    pub md5: String,
    /// Asset key wrapped for the owner.
    pub key: String,
}

impl NewAsset {
    /// Type tag to persist, defaulting an empty tag to "photo".
    pub fn effective_type(&self) -> &str {
        if self.asset_type.is_empty() {
            DEFAULT_ASSET_TYPE
        } else {
            &self.asset_type
        }
    }

    /// Locator of the original representation; an empty locator counts as
    /// absent.
    pub fn original_locator(&self) -> Option<&str> {
        self.remote_path_orig
            .as_deref()
            .filter(|path| !path.is_empty())
    }
}

/// A persisted asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Asset id.
    pub asset_id: String,
    /// Owning user id.
    pub owner_id: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub asset_type: String,
    /// Locator of the low representation.
    pub remote_path: String,
    /// Locator of the original representation.
    pub remote_path_orig: Option<String>,
    /// Capture timestamp.
    pub create_date: Option<String>,
    /// Capture location.
    pub location: Option<String>,
    /// Media duration.
    pub duration: Option<String>,
    /// Original filename.
    pub original_filename: Option<String>,
    /// Original uniform type identifier.
    pub original_uti: Option<String>,
    /// Pixel width.
    pub pixel_width: u32,
    /// Pixel height.
    pub pixel_height: u32,
    /// Integrity digest.
    pub md5: String,
    /// Asset key wrapped for the owner.
    pub key: String,
    /// Billable size of both representations, once the original exists.
    pub total_size: Option<u64>,
}
