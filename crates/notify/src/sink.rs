//! Notification sink trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::kind::NotificationKind;

/// Delivers notifications to users.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Notify a set of users of an event.
    ///
    /// # Arguments
    /// * `user_ids` - Recipients
    /// * `kind` - Event kind
    /// * `data` - Extra payload fields
    async fn notify(
        &self,
        user_ids: &[String],
        kind: NotificationKind,
        data: Option<&HashMap<String, String>>,
    ) -> Result<(), NotifyError>;
}

/// Sink that drops every notification.
///
/// Used when no push provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn notify(
        &self,
        user_ids: &[String],
        kind: NotificationKind,
        _data: Option<&HashMap<String, String>>,
    ) -> Result<(), NotifyError> {
        log::debug!("Dropping {} notification for {} users", kind, user_ids.len());
        Ok(())
    }
}
