//! Metadata store trait.

use std::collections::HashMap;

use async_trait::async_trait;
use photoshare_model::{
    AssetRecord, ContactResolution, GroupAlbum, GroupRecord, HashedContacts, MemberInvite,
    NewAsset, NewUser, UserRecord,
};

use crate::error::MetadataError;

/// Pluggable backend for metadata persistence.
///
/// `subject` is always the verified identity-provider subject of the caller.
/// Atomicity of each single call is the backend's responsibility; nothing
/// spans calls.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Register a user.
    async fn create_user(&self, user: &NewUser) -> Result<(), MetadataError>;

    /// Look up the caller's own user record.
    async fn get_user(&self, subject: &str) -> Result<UserRecord, MetadataError>;

    /// Overwrite the caller's hashed contact identifiers.
    async fn update_user_contact(
        &self,
        subject: &str,
        contacts: &HashedContacts,
    ) -> Result<(), MetadataError>;

    /// Resolve user ids, hashed phone numbers and hashed emails to users.
    ///
    /// Returns `NoData` when nothing matched in any of the three spaces.
    async fn get_public_info_for_users(
        &self,
        ids: &[String],
        phone_digests: &[String],
        email_digests: &[String],
    ) -> Result<ContactResolution, MetadataError>;

    /// Return the subset of `ids` that name existing users.
    async fn verify_identifiers(&self, ids: &[String]) -> Result<Vec<String>, MetadataError>;

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Create a group with the caller as its founding, joined member.
    async fn create_group(
        &self,
        subject: &str,
        group_id: &str,
        name: &str,
        wrapped_key: &str,
    ) -> Result<(), MetadataError>;

    /// Groups the caller is a member of (joined or invited), keyed by group id.
    async fn get_groups(&self, subject: &str) -> Result<HashMap<String, GroupRecord>, MetadataError>;

    /// Accept an invitation, replacing the wrapped group key.
    async fn join_group(
        &self,
        subject: &str,
        group_id: &str,
        wrapped_key: &str,
    ) -> Result<(), MetadataError>;

    /// Invite users into a group the caller has joined.
    async fn add_users_to_group(
        &self,
        subject: &str,
        group_id: &str,
        invites: &[MemberInvite],
    ) -> Result<(), MetadataError>;

    /// Members of a group the caller belongs to: user id → public key.
    async fn get_users_in_group(
        &self,
        subject: &str,
        group_id: &str,
    ) -> Result<HashMap<String, String>, MetadataError>;

    /// Remove the caller's membership; the last member leaving closes the group.
    async fn leave_group(&self, subject: &str, group_id: &str) -> Result<(), MetadataError>;

    // ------------------------------------------------------------------
    // Assets
    // ------------------------------------------------------------------

    /// Persist a new asset owned by the caller.
    async fn create_asset(
        &self,
        subject: &str,
        asset: &NewAsset,
        total_size: Option<u64>,
    ) -> Result<(), MetadataError>;

    /// Delete the caller's assets and return the storage locators they referenced.
    async fn delete_assets(
        &self,
        subject: &str,
        asset_ids: &[String],
    ) -> Result<Vec<String>, MetadataError>;

    /// Record the original representation of one of the caller's assets.
    async fn add_path_for_original_asset(
        &self,
        subject: &str,
        asset_id: &str,
        remote_path_orig: &str,
        total_size: u64,
    ) -> Result<(), MetadataError>;

    /// Overwrite original filenames: asset id → filename.
    async fn set_original_filenames(
        &self,
        subject: &str,
        filenames: &HashMap<String, String>,
    ) -> Result<(), MetadataError>;

    /// The caller's assets, keyed by asset id.
    async fn get_assets(&self, subject: &str) -> Result<HashMap<String, AssetRecord>, MetadataError>;

    // ------------------------------------------------------------------
    // Group albums and sharing
    // ------------------------------------------------------------------

    /// Place the caller's assets in a group album.
    async fn add_assets_to_group(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError>;

    /// Remove the caller's assets from a group album (and unshare them).
    async fn remove_assets_from_group(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError>;

    /// Share the caller's assets with a group; `wrapped_keys` aligns 1:1 with `asset_ids`.
    async fn share_assets(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
        wrapped_keys: &[String],
    ) -> Result<(), MetadataError>;

    /// Stop sharing the caller's assets with a group.
    async fn unshare_assets(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError>;

    /// Album and shared assets of every group the caller has joined.
    async fn get_assets_for_all_groups(
        &self,
        subject: &str,
    ) -> Result<HashMap<String, GroupAlbum>, MetadataError>;
}
