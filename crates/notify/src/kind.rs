//! Notification event kinds.

use std::collections::HashMap;
use std::fmt;

/// Payload field carrying the group id of a group event.
pub const GROUP_ID_FIELD: &str = "groupid";

/// Kind of event a notification announces.
///
/// The string form is what clients switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A member joined the group.
    UserJoinedGroup,
    /// The recipient was invited into a group.
    GroupInvite,
    /// A member left the group.
    UserLeftGroup,
    /// Album or shared assets of the group changed.
    AssetsChangedForGroup,
    /// A member shared new assets with the group.
    AssetsAddedToGroupByUser,
}

impl NotificationKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::UserJoinedGroup => "UserJoinedGroup",
            NotificationKind::GroupInvite => "GroupInvite",
            NotificationKind::UserLeftGroup => "UserLeftGroup",
            NotificationKind::AssetsChangedForGroup => "AssetsChangedForGroup",
            NotificationKind::AssetsAddedToGroupByUser => "AssetsAddedToGroupByUser",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload for an event about one group.
pub fn group_payload(group_id: &str) -> HashMap<String, String> {
    HashMap::from([(GROUP_ID_FIELD.to_string(), group_id.to_string())])
}
