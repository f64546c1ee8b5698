//! Notification error types.

use thiserror::Error;

/// Errors that can occur while delivering notifications.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The request never reached the provider.
    #[error("Notification transport error: {0}")]
    Transport(String),

    /// The provider answered with a failure status.
    #[error("Notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}
