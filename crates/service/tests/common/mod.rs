//! Shared fixtures for service integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use photoshare_identity::{
    IdentityError, IdentityVerifier, ProviderIdentities, RequestContext, VerifiedIdentity,
};
use photoshare_metadata::{MetadataError, MetadataStore, SqliteMetadataStore};
use photoshare_model::{
    AssetRecord, ContactResolution, GroupAlbum, GroupRecord, HashedContacts, MemberInvite,
    NewAsset, NewUser, UserRecord,
};
use photoshare_notify::memory::MemoryNotificationSink;
use photoshare_service::{CredentialBroker, ServiceConfig, SharingService};
use photoshare_storage::memory::MemoryStorageClient;

/// Metadata store that records every call and can be made to misbehave.
pub struct RecordingMetadataStore {
    inner: SqliteMetadataStore,
    calls: Mutex<Vec<&'static str>>,
    members_no_data: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
}

impl RecordingMetadataStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteMetadataStore::open_in_memory().unwrap(),
            calls: Mutex::new(Vec::new()),
            members_no_data: Mutex::new(false),
            delay: Mutex::new(None),
        }
    }

    /// Names of the operations called so far.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Make member listing report no data.
    pub fn hide_members(&self) {
        *self.members_no_data.lock().unwrap() = true;
    }

    /// Delay every call.
    pub fn slow_down(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    async fn record(&self, op: &'static str) {
        self.calls.lock().unwrap().push(op);
        let delay: Option<Duration> = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MetadataStore for RecordingMetadataStore {
    async fn create_user(&self, user: &NewUser) -> Result<(), MetadataError> {
        self.record("create_user").await;
        self.inner.create_user(user).await
    }

    async fn get_user(&self, subject: &str) -> Result<UserRecord, MetadataError> {
        self.record("get_user").await;
        self.inner.get_user(subject).await
    }

    async fn update_user_contact(
        &self,
        subject: &str,
        contacts: &HashedContacts,
    ) -> Result<(), MetadataError> {
        self.record("update_user_contact").await;
        self.inner.update_user_contact(subject, contacts).await
    }

    async fn get_public_info_for_users(
        &self,
        ids: &[String],
        phone_digests: &[String],
        email_digests: &[String],
    ) -> Result<ContactResolution, MetadataError> {
        self.record("get_public_info_for_users").await;
        self.inner
            .get_public_info_for_users(ids, phone_digests, email_digests)
            .await
    }

    async fn verify_identifiers(&self, ids: &[String]) -> Result<Vec<String>, MetadataError> {
        self.record("verify_identifiers").await;
        self.inner.verify_identifiers(ids).await
    }

    async fn create_group(
        &self,
        subject: &str,
        group_id: &str,
        name: &str,
        wrapped_key: &str,
    ) -> Result<(), MetadataError> {
        self.record("create_group").await;
        self.inner
            .create_group(subject, group_id, name, wrapped_key)
            .await
    }

    async fn get_groups(&self, subject: &str) -> Result<HashMap<String, GroupRecord>, MetadataError> {
        self.record("get_groups").await;
        self.inner.get_groups(subject).await
    }

    async fn join_group(
        &self,
        subject: &str,
        group_id: &str,
        wrapped_key: &str,
    ) -> Result<(), MetadataError> {
        self.record("join_group").await;
        self.inner.join_group(subject, group_id, wrapped_key).await
    }

    async fn add_users_to_group(
        &self,
        subject: &str,
        group_id: &str,
        invites: &[MemberInvite],
    ) -> Result<(), MetadataError> {
        self.record("add_users_to_group").await;
        self.inner.add_users_to_group(subject, group_id, invites).await
    }

    async fn get_users_in_group(
        &self,
        subject: &str,
        group_id: &str,
    ) -> Result<HashMap<String, String>, MetadataError> {
        self.record("get_users_in_group").await;
        if *self.members_no_data.lock().unwrap() {
            return Err(MetadataError::NoData);
        }
        self.inner.get_users_in_group(subject, group_id).await
    }

    async fn leave_group(&self, subject: &str, group_id: &str) -> Result<(), MetadataError> {
        self.record("leave_group").await;
        self.inner.leave_group(subject, group_id).await
    }

    async fn create_asset(
        &self,
        subject: &str,
        asset: &NewAsset,
        total_size: Option<u64>,
    ) -> Result<(), MetadataError> {
        self.record("create_asset").await;
        self.inner.create_asset(subject, asset, total_size).await
    }

    async fn delete_assets(
        &self,
        subject: &str,
        asset_ids: &[String],
    ) -> Result<Vec<String>, MetadataError> {
        self.record("delete_assets").await;
        self.inner.delete_assets(subject, asset_ids).await
    }

    async fn add_path_for_original_asset(
        &self,
        subject: &str,
        asset_id: &str,
        remote_path_orig: &str,
        total_size: u64,
    ) -> Result<(), MetadataError> {
        self.record("add_path_for_original_asset").await;
        self.inner
            .add_path_for_original_asset(subject, asset_id, remote_path_orig, total_size)
            .await
    }

    async fn set_original_filenames(
        &self,
        subject: &str,
        filenames: &HashMap<String, String>,
    ) -> Result<(), MetadataError> {
        self.record("set_original_filenames").await;
        self.inner.set_original_filenames(subject, filenames).await
    }

    async fn get_assets(&self, subject: &str) -> Result<HashMap<String, AssetRecord>, MetadataError> {
        self.record("get_assets").await;
        self.inner.get_assets(subject).await
    }

    async fn add_assets_to_group(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError> {
        self.record("add_assets_to_group").await;
        self.inner.add_assets_to_group(subject, group_id, asset_ids).await
    }

    async fn remove_assets_from_group(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError> {
        self.record("remove_assets_from_group").await;
        self.inner
            .remove_assets_from_group(subject, group_id, asset_ids)
            .await
    }

    async fn share_assets(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
        wrapped_keys: &[String],
    ) -> Result<(), MetadataError> {
        self.record("share_assets").await;
        self.inner
            .share_assets(subject, group_id, asset_ids, wrapped_keys)
            .await
    }

    async fn unshare_assets(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
    ) -> Result<(), MetadataError> {
        self.record("unshare_assets").await;
        self.inner.unshare_assets(subject, group_id, asset_ids).await
    }

    async fn get_assets_for_all_groups(
        &self,
        subject: &str,
    ) -> Result<HashMap<String, GroupAlbum>, MetadataError> {
        self.record("get_assets_for_all_groups").await;
        self.inner.get_assets_for_all_groups(subject).await
    }
}

/// Accepts tokens of the form `token-<subject>`.
pub struct PrefixVerifier;

#[async_trait]
impl IdentityVerifier for PrefixVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let subject: &str = token
            .strip_prefix("token-")
            .ok_or_else(|| IdentityError::InvalidToken("unknown issuer".to_string()))?;
        Ok(VerifiedIdentity {
            subject: subject.to_string(),
            identities: ProviderIdentities {
                phone: Some(format!("+1555{}", subject.len())),
                email: Some(format!("{}@example.com", subject)),
                apple_id: None,
            },
        })
    }
}

/// A service wired to in-memory collaborators, with handles to inspect them.
pub struct Fixture {
    pub service: SharingService,
    pub store: Arc<RecordingMetadataStore>,
    pub storage: Arc<MemoryStorageClient>,
    pub sink: Arc<MemoryNotificationSink>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default().with_request_timeout(Duration::from_secs(5)))
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        let store: Arc<RecordingMetadataStore> = Arc::new(RecordingMetadataStore::new());
        let storage: Arc<MemoryStorageClient> = Arc::new(MemoryStorageClient::new());
        let sink: Arc<MemoryNotificationSink> = Arc::new(MemoryNotificationSink::new());
        let service: SharingService = SharingService::new(
            &config,
            store.clone(),
            CredentialBroker::shared(storage.clone()),
            Arc::new(PrefixVerifier),
            sink.clone(),
        );
        Self {
            service,
            store,
            storage,
            sink,
        }
    }

    /// Authenticate and register a user; returns its context and user id.
    pub async fn register(&self, subject: &str) -> (RequestContext, String) {
        let header: String = format!("Bearer token-{}", subject);
        let ctx: RequestContext = self.service.authenticate(Some(&header)).await.unwrap();
        let user_id: String = self
            .service
            .register_user(&ctx, &format!("pub-{}", subject), &format!("priv-{}", subject))
            .await
            .unwrap();
        (ctx, user_id)
    }
}

/// Asset whose low representation lives at `<bucket>/<id>_low`.
pub fn asset(bucket: &str, id: &str) -> NewAsset {
    NewAsset {
        asset_id: id.to_string(),
        remote_path: format!("https://s3.us-east-1.amazonaws.com/{}/{}_low", bucket, id),
        pixel_width: 4032,
        pixel_height: 3024,
        md5: "9e107d9d372bb6826bd81d3542a419d6".to_string(),
        key: format!("wrapped-{}", id),
        ..Default::default()
    }
}

/// Same as [`asset`] but with the original representation attached.
pub fn asset_with_original(bucket: &str, id: &str) -> NewAsset {
    let mut asset: NewAsset = asset(bucket, id);
    asset.remote_path_orig = Some(format!(
        "https://s3.us-east-1.amazonaws.com/{}/{}_original",
        bucket, id
    ));
    asset
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
