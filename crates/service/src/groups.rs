//! Group membership and asset sharing, with notification fan-out.
//!
//! Each mutation is a single metadata call. Notifications go out only after
//! it succeeds, and their failure never changes the mutation's outcome.

use std::collections::HashMap;
use std::sync::Arc;

use photoshare_common::{require_non_empty, require_uuid, ValidationError};
use photoshare_metadata::{MetadataError, MetadataStore};
use photoshare_model::{GroupRecord, MemberInvite};
use photoshare_notify::{group_payload, NotificationKind, NotificationSink};
use uuid::Uuid;

use crate::error::ServiceError;

/// Album membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumChange {
    /// Place assets in the group album.
    Add,
    /// Take assets out of the group album.
    Remove,
}

/// Sharing change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharingChange<'a> {
    /// Share, with one wrapped asset key per asset id.
    Share { wrapped_keys: &'a [String] },
    /// Stop sharing.
    Unshare,
}

/// Coordinates group membership, album and sharing edges.
pub struct GroupSharingCoordinator {
    metadata: Arc<dyn MetadataStore>,
    notifications: Arc<dyn NotificationSink>,
}

impl GroupSharingCoordinator {
    /// Create a coordinator.
    pub fn new(metadata: Arc<dyn MetadataStore>, notifications: Arc<dyn NotificationSink>) -> Self {
        Self {
            metadata,
            notifications,
        }
    }

    /// Create a group with the caller as founding member.
    ///
    /// # Returns
    /// The new group id.
    pub async fn create_group(
        &self,
        subject: &str,
        name: &str,
        wrapped_key: &str,
    ) -> Result<String, ServiceError> {
        require_non_empty(&[name, wrapped_key])?;
        let group_id: String = Uuid::new_v4().to_string();
        self.metadata
            .create_group(subject, &group_id, name, wrapped_key)
            .await?;
        tracing::info!(group_id = %group_id, "created group");
        Ok(group_id)
    }

    /// Groups the caller belongs to.
    pub async fn groups(&self, subject: &str) -> Result<HashMap<String, GroupRecord>, ServiceError> {
        Ok(self.metadata.get_groups(subject).await?)
    }

    /// Members of a group: user id → public key.
    pub async fn group_members(
        &self,
        subject: &str,
        group_id: &str,
    ) -> Result<HashMap<String, String>, ServiceError> {
        require_uuid("group id", group_id)?;
        Ok(self.metadata.get_users_in_group(subject, group_id).await?)
    }

    /// Accept an invitation.
    pub async fn join_group(
        &self,
        subject: &str,
        group_id: &str,
        wrapped_key: &str,
    ) -> Result<(), ServiceError> {
        require_uuid("group id", group_id)?;
        require_non_empty(&[wrapped_key])?;
        self.metadata.join_group(subject, group_id, wrapped_key).await?;

        self.notify_members(subject, group_id, NotificationKind::UserJoinedGroup)
            .await;
        Ok(())
    }

    /// Leave a group.
    ///
    /// Remaining members are taken before leaving, since the caller can no
    /// longer list them afterwards.
    pub async fn leave_group(&self, subject: &str, group_id: &str) -> Result<(), ServiceError> {
        require_uuid("group id", group_id)?;

        let mut recipients: Vec<String> = self.member_ids(subject, group_id).await;
        if !recipients.is_empty() {
            match self.metadata.get_user(subject).await {
                Ok(user) => recipients.retain(|id| *id != user.id),
                Err(e) => tracing::warn!("could not resolve leaving user: {}", e),
            }
        }

        self.metadata.leave_group(subject, group_id).await?;

        self.send(&recipients, NotificationKind::UserLeftGroup, group_id)
            .await;
        Ok(())
    }

    /// Invite users into a group; the invitees are notified.
    pub async fn add_members(
        &self,
        subject: &str,
        group_id: &str,
        invites: &[MemberInvite],
    ) -> Result<(), ServiceError> {
        require_uuid("group id", group_id)?;
        if invites.is_empty() {
            return Err(ValidationError::empty("users").into());
        }
        for invite in invites {
            require_non_empty(&[invite.user_id.as_str(), invite.group_key.as_str()])?;
        }

        self.metadata
            .add_users_to_group(subject, group_id, invites)
            .await?;

        let invitees: Vec<String> = invites.iter().map(|i| i.user_id.clone()).collect();
        self.send(&invitees, NotificationKind::GroupInvite, group_id)
            .await;
        Ok(())
    }

    /// Add assets to or remove them from a group album.
    ///
    /// Only removal notifies members.
    pub async fn amend_asset_membership(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
        change: AlbumChange,
    ) -> Result<(), ServiceError> {
        require_uuid("group id", group_id)?;
        if asset_ids.is_empty() {
            return Err(ValidationError::empty("asset ids").into());
        }

        match change {
            AlbumChange::Add => {
                self.metadata
                    .add_assets_to_group(subject, group_id, asset_ids)
                    .await?;
            }
            AlbumChange::Remove => {
                self.metadata
                    .remove_assets_from_group(subject, group_id, asset_ids)
                    .await?;
                self.notify_members(subject, group_id, NotificationKind::AssetsChangedForGroup)
                    .await;
            }
        }
        Ok(())
    }

    /// Share assets with a group or stop sharing them.
    ///
    /// # Errors
    /// Sharing fails validation before any store call unless there is exactly
    /// one wrapped key per asset id.
    pub async fn amend_sharing(
        &self,
        subject: &str,
        group_id: &str,
        asset_ids: &[String],
        change: SharingChange<'_>,
    ) -> Result<(), ServiceError> {
        require_uuid("group id", group_id)?;
        if asset_ids.is_empty() {
            return Err(ValidationError::empty("asset ids").into());
        }

        let kind: NotificationKind = match change {
            SharingChange::Share { wrapped_keys } => {
                if wrapped_keys.len() != asset_ids.len() {
                    return Err(ValidationError::KeyCountMismatch {
                        expected: asset_ids.len(),
                        actual: wrapped_keys.len(),
                    }
                    .into());
                }
                self.metadata
                    .share_assets(subject, group_id, asset_ids, wrapped_keys)
                    .await?;
                NotificationKind::AssetsAddedToGroupByUser
            }
            SharingChange::Unshare => {
                self.metadata
                    .unshare_assets(subject, group_id, asset_ids)
                    .await?;
                NotificationKind::AssetsChangedForGroup
            }
        };

        self.notify_members(subject, group_id, kind).await;
        Ok(())
    }

    /// Current member ids, or none when they cannot be listed.
    async fn member_ids(&self, subject: &str, group_id: &str) -> Vec<String> {
        match self.metadata.get_users_in_group(subject, group_id).await {
            Ok(members) => {
                let mut ids: Vec<String> = members.into_keys().collect();
                ids.sort();
                ids
            }
            Err(MetadataError::NoData) => Vec::new(),
            Err(e) => {
                tracing::warn!(group_id, "could not list members to notify: {}", e);
                Vec::new()
            }
        }
    }

    async fn notify_members(&self, subject: &str, group_id: &str, kind: NotificationKind) {
        let recipients: Vec<String> = self.member_ids(subject, group_id).await;
        self.send(&recipients, kind, group_id).await;
    }

    async fn send(&self, recipients: &[String], kind: NotificationKind, group_id: &str) {
        if recipients.is_empty() {
            return;
        }
        let data: HashMap<String, String> = group_payload(group_id);
        if let Err(e) = self.notifications.notify(recipients, kind, Some(&data)).await {
            tracing::warn!(%kind, group_id, "notification failed: {}", e);
        }
    }
}
