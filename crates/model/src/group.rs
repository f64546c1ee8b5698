//! Groups, memberships and sharing edges.

use serde::{Deserialize, Serialize};

use crate::asset::AssetRecord;

/// A group as seen by one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    /// Group id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Group key wrapped for the viewing member.
    pub key: String,
    /// Whether the viewer has joined, as opposed to only being invited.
    pub joined: bool,
    /// Ids of all members, including the viewer.
    pub members: Vec<String>,
}

/// An invitation of one user into a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInvite {
    /// Invited user id.
    pub user_id: String,
    /// Group key wrapped for the invited user.
    pub group_key: String,
}

impl MemberInvite {
    /// Create a new invite.
    ///
    /// # Arguments
    /// * `user_id` - Invited user id
    /// * `group_key` - Group key wrapped for that user
    pub fn new(user_id: impl Into<String>, group_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            group_key: group_key.into(),
        }
    }
}

/// An asset made visible to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedAsset {
    /// The shared asset.
    pub asset: AssetRecord,
    /// Asset key wrapped with the group key.
    pub wrapped_key: String,
}

/// Assets associated with a group, from the viewpoint of one member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAlbum {
    /// The viewer's own assets placed in the group album.
    pub asset_ids: Vec<String>,
    /// Assets any member shared with the group.
    pub shared: Vec<SharedAsset>,
}
