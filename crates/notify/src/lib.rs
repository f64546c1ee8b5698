//! Push notifications for photoshare.
//!
//! Membership and sharing changes fan out to group members through a
//! [`NotificationSink`]. Delivery is best effort: callers log failures and
//! carry on.

mod error;
mod kind;
pub mod memory;
mod onesignal;
mod sink;

pub use error::NotifyError;
pub use kind::{group_payload, NotificationKind, GROUP_ID_FIELD};
pub use onesignal::{OneSignalSettings, OneSignalSink, ONESIGNAL_API_URL};
pub use sink::{NoopSink, NotificationSink};
