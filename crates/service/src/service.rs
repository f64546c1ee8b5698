//! Request facade.
//!
//! Every operation runs as one unit of work under the process-wide deadline
//! and concurrency limit. Operations that touch object storage resolve one
//! backend through the [`CredentialBroker`] and use it for every step.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use photoshare_identity::{authenticate, ClaimIssuer, IdentityVerifier, RequestContext};
use photoshare_metadata::MetadataStore;
use photoshare_model::{
    AssetRecord, ContactResolution, GroupAlbum, GroupRecord, MemberInvite, NewAsset, SizeMap,
    UserRecord,
};
use photoshare_notify::NotificationSink;
use photoshare_storage::StorageClient;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::assets::AssetLifecycleCoordinator;
use crate::broker::CredentialBroker;
use crate::config::ServiceConfig;
use crate::contacts::ContactMatcher;
use crate::error::{ErrorClass, ServiceError};
use crate::groups::{AlbumChange, GroupSharingCoordinator, SharingChange};
use crate::users::UserDirectory;

/// The photoshare service.
pub struct SharingService {
    request_timeout: Duration,
    throttle: Semaphore,
    verifier: Arc<dyn IdentityVerifier>,
    broker: CredentialBroker,
    users: UserDirectory,
    assets: AssetLifecycleCoordinator,
    groups: GroupSharingCoordinator,
    contacts: ContactMatcher,
}

impl SharingService {
    /// Assemble the service from its collaborators.
    ///
    /// # Arguments
    /// * `config` - Deadline and concurrency limit are taken from here
    /// * `metadata` - Metadata store shared by every coordinator
    /// * `broker` - Storage backend resolution
    /// * `verifier` - Bearer token verification
    /// * `notifications` - Push fan-out
    pub fn new(
        config: &ServiceConfig,
        metadata: Arc<dyn MetadataStore>,
        broker: CredentialBroker,
        verifier: Arc<dyn IdentityVerifier>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            request_timeout: config.request_timeout,
            throttle: Semaphore::new(config.max_concurrent_requests),
            verifier,
            broker,
            users: UserDirectory::new(Arc::clone(&metadata)),
            assets: AssetLifecycleCoordinator::new(Arc::clone(&metadata)),
            groups: GroupSharingCoordinator::new(Arc::clone(&metadata), notifications),
            contacts: ContactMatcher::new(metadata),
        }
    }

    /// Enable direct storage claims.
    pub fn with_claim_issuer(mut self, issuer: Arc<dyn ClaimIssuer>) -> Self {
        self.users = self.users.with_claim_issuer(issuer);
        self
    }

    /// Stop admitting requests. Requests already running finish normally.
    pub fn close(&self) {
        self.throttle.close();
    }

    async fn admit(&self) -> Result<SemaphorePermit<'_>, ServiceError> {
        self.throttle
            .acquire()
            .await
            .map_err(|_| ServiceError::ShuttingDown)
    }

    /// Run one unit of work under the deadline and the concurrency limit.
    ///
    /// Waiting for a permit counts against the deadline.
    async fn guarded<T, F>(&self, operation: &'static str, work: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        let bounded = async {
            let _permit: SemaphorePermit<'_> = self.admit().await?;
            work.await
        };
        let result: Result<T, ServiceError> =
            match tokio::time::timeout(self.request_timeout, bounded).await {
                Ok(result) => result,
                Err(_) => Err(ServiceError::Timeout(self.request_timeout)),
            };

        if let Err(e) = &result {
            match e.class() {
                ErrorClass::ServerFault => tracing::error!(operation, "request failed: {}", e),
                ErrorClass::Timeout => tracing::warn!(operation, "request timed out"),
                _ => tracing::debug!(operation, "request rejected: {}", e),
            }
        }
        result
    }

    async fn storage(&self, ctx: &RequestContext) -> Result<Arc<dyn StorageClient>, ServiceError> {
        self.broker.resolve(ctx).await
    }

    // ------------------------------------------------------------------
    // Identity and users
    // ------------------------------------------------------------------

    /// Verify a request's `Authorization` header.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<RequestContext, ServiceError> {
        self.guarded("authenticate", async {
            Ok(authenticate(self.verifier.as_ref(), authorization).await?)
        })
        .await
    }

    /// Register the caller; returns the new user id.
    pub async fn register_user(
        &self,
        ctx: &RequestContext,
        public_key: &str,
        private_key: &str,
    ) -> Result<String, ServiceError> {
        self.guarded("register_user", self.users.register_user(ctx, public_key, private_key))
            .await
    }

    /// The caller's own record.
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<UserRecord, ServiceError> {
        self.guarded("current_user", self.users.current_user(ctx)).await
    }

    /// Refresh the caller's stored contact digests.
    pub async fn update_contact(&self, ctx: &RequestContext) -> Result<(), ServiceError> {
        self.guarded("update_contact", self.users.update_contact(ctx)).await
    }

    /// Public key of a user.
    pub async fn public_key(&self, user_id: &str) -> Result<String, ServiceError> {
        self.guarded("public_key", self.users.public_key(user_id)).await
    }

    /// Registered subset of the given user ids.
    pub async fn verify_identifiers(&self, ids: &[String]) -> Result<Vec<String>, ServiceError> {
        self.guarded("verify_identifiers", self.users.verify_identifiers(ids))
            .await
    }

    /// Grant the caller direct object-store credentials.
    pub async fn grant_storage_claim(&self, ctx: &RequestContext) -> Result<(), ServiceError> {
        self.guarded("grant_storage_claim", self.users.grant_storage_claim(ctx))
            .await
    }

    /// Resolve hashed contacts to users.
    pub async fn resolve_contacts(
        &self,
        ids: &[String],
        phone_digests: &[String],
        email_digests: &[String],
    ) -> Result<ContactResolution, ServiceError> {
        self.guarded(
            "resolve_contacts",
            self.contacts.resolve(ids, phone_digests, email_digests),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    /// Create a group; returns its id.
    pub async fn create_group(
        &self,
        ctx: &RequestContext,
        name: &str,
        wrapped_key: &str,
    ) -> Result<String, ServiceError> {
        self.guarded(
            "create_group",
            self.groups.create_group(&ctx.subject, name, wrapped_key),
        )
        .await
    }

    /// Groups the caller belongs to.
    pub async fn groups(&self, ctx: &RequestContext) -> Result<HashMap<String, GroupRecord>, ServiceError> {
        self.guarded("groups", self.groups.groups(&ctx.subject)).await
    }

    /// Members of a group.
    pub async fn group_members(
        &self,
        ctx: &RequestContext,
        group_id: &str,
    ) -> Result<HashMap<String, String>, ServiceError> {
        self.guarded(
            "group_members",
            self.groups.group_members(&ctx.subject, group_id),
        )
        .await
    }

    /// Accept an invitation.
    pub async fn join_group(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        wrapped_key: &str,
    ) -> Result<(), ServiceError> {
        self.guarded(
            "join_group",
            self.groups.join_group(&ctx.subject, group_id, wrapped_key),
        )
        .await
    }

    /// Leave a group.
    pub async fn leave_group(&self, ctx: &RequestContext, group_id: &str) -> Result<(), ServiceError> {
        self.guarded("leave_group", self.groups.leave_group(&ctx.subject, group_id))
            .await
    }

    /// Invite users into a group.
    pub async fn add_members(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        invites: &[MemberInvite],
    ) -> Result<(), ServiceError> {
        self.guarded(
            "add_members",
            self.groups.add_members(&ctx.subject, group_id, invites),
        )
        .await
    }

    /// Add assets to or remove them from a group album.
    pub async fn amend_asset_membership(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        asset_ids: &[String],
        change: AlbumChange,
    ) -> Result<(), ServiceError> {
        self.guarded(
            "amend_asset_membership",
            self.groups
                .amend_asset_membership(&ctx.subject, group_id, asset_ids, change),
        )
        .await
    }

    /// Share assets with a group or stop sharing them.
    pub async fn amend_sharing(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        asset_ids: &[String],
        change: SharingChange<'_>,
    ) -> Result<(), ServiceError> {
        self.guarded(
            "amend_sharing",
            self.groups
                .amend_sharing(&ctx.subject, group_id, asset_ids, change),
        )
        .await
    }

    // ------------------------------------------------------------------
    // Assets
    // ------------------------------------------------------------------

    /// Create one asset; returns its billable size when an original path was given.
    pub async fn create_asset(
        &self,
        ctx: &RequestContext,
        asset: &NewAsset,
    ) -> Result<Option<u64>, ServiceError> {
        self.guarded("create_asset", async {
            let storage: Arc<dyn StorageClient> = self.storage(ctx).await?;
            self.assets
                .create_asset(&ctx.subject, asset, storage.as_ref())
                .await
        })
        .await
    }

    /// Create several assets, stopping at the first failure.
    pub async fn create_assets(
        &self,
        ctx: &RequestContext,
        assets: &[NewAsset],
    ) -> Result<SizeMap, ServiceError> {
        self.guarded("create_assets", async {
            let storage: Arc<dyn StorageClient> = self.storage(ctx).await?;
            self.assets
                .create_many(&ctx.subject, assets, storage.as_ref())
                .await
        })
        .await
    }

    /// Create and delete assets in one request.
    pub async fn patch_assets(
        &self,
        ctx: &RequestContext,
        create: &[NewAsset],
        delete: &[String],
    ) -> Result<SizeMap, ServiceError> {
        self.guarded("patch_assets", async {
            let storage: Arc<dyn StorageClient> = self.storage(ctx).await?;
            self.assets
                .patch_assets(&ctx.subject, create, delete, storage.as_ref())
                .await
        })
        .await
    }

    /// Delete assets and their stored objects.
    pub async fn delete_assets(
        &self,
        ctx: &RequestContext,
        asset_ids: &[String],
    ) -> Result<(), ServiceError> {
        self.guarded("delete_assets", async {
            let storage: Arc<dyn StorageClient> = self.storage(ctx).await?;
            self.assets
                .delete_assets(&ctx.subject, asset_ids, storage.as_ref())
                .await
        })
        .await
    }

    /// Attach the original representation of one asset; returns its billable size.
    pub async fn attach_original_path(
        &self,
        ctx: &RequestContext,
        asset_id: &str,
        remote_path_orig: &str,
    ) -> Result<u64, ServiceError> {
        self.guarded("attach_original_path", async {
            let storage: Arc<dyn StorageClient> = self.storage(ctx).await?;
            self.assets
                .attach_original_path(&ctx.subject, asset_id, remote_path_orig, storage.as_ref())
                .await
        })
        .await
    }

    /// Attach original representations in bulk.
    pub async fn attach_original_paths(
        &self,
        ctx: &RequestContext,
        paths: &HashMap<String, String>,
    ) -> Result<SizeMap, ServiceError> {
        self.guarded("attach_original_paths", async {
            let storage: Arc<dyn StorageClient> = self.storage(ctx).await?;
            self.assets
                .attach_original_paths(&ctx.subject, paths, storage.as_ref())
                .await
        })
        .await
    }

    /// Overwrite the original filename of one asset.
    pub async fn set_original_filename(
        &self,
        ctx: &RequestContext,
        asset_id: &str,
        filename: &str,
    ) -> Result<(), ServiceError> {
        self.guarded(
            "set_original_filename",
            self.assets
                .set_original_filename(&ctx.subject, asset_id, filename),
        )
        .await
    }

    /// Overwrite original filenames in bulk.
    pub async fn set_original_filenames(
        &self,
        ctx: &RequestContext,
        filenames: &HashMap<String, String>,
    ) -> Result<(), ServiceError> {
        self.guarded(
            "set_original_filenames",
            self.assets.set_original_filenames(&ctx.subject, filenames),
        )
        .await
    }

    /// The caller's assets.
    pub async fn assets(&self, ctx: &RequestContext) -> Result<HashMap<String, AssetRecord>, ServiceError> {
        self.guarded("assets", self.assets.assets(&ctx.subject)).await
    }

    /// Album and shared assets of the caller's groups.
    pub async fn group_albums(
        &self,
        ctx: &RequestContext,
    ) -> Result<HashMap<String, GroupAlbum>, ServiceError> {
        self.guarded("group_albums", self.assets.group_albums(&ctx.subject))
            .await
    }
}
