//! In-memory notification sink that records what it was asked to send.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::NotifyError;
use crate::kind::NotificationKind;
use crate::sink::NotificationSink;

/// One recorded `notify` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    /// Recipients.
    pub user_ids: Vec<String>,
    /// Event kind.
    pub kind: NotificationKind,
    /// Payload fields.
    pub data: HashMap<String, String>,
}

/// Recording sink for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryNotificationSink {
    sent: Mutex<Vec<SentNotification>>,
    failing: Mutex<bool>,
}

impl MemoryNotificationSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (after being recorded).
    pub fn fail_all(&self) {
        *self.failing.lock().unwrap() = true;
    }

    /// Calls recorded so far.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for MemoryNotificationSink {
    async fn notify(
        &self,
        user_ids: &[String],
        kind: NotificationKind,
        data: Option<&HashMap<String, String>>,
    ) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(SentNotification {
            user_ids: user_ids.to_vec(),
            kind,
            data: data.cloned().unwrap_or_default(),
        });
        if *self.failing.lock().unwrap() {
            return Err(NotifyError::Transport("sink configured to fail".to_string()));
        }
        Ok(())
    }
}
