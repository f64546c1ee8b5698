//! Metadata store error types.

use thiserror::Error;

/// Errors that can occur during metadata operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// The query legitimately found nothing, or the caller's scope matched nothing.
    #[error("no data")]
    NoData,

    /// The request is inconsistent (e.g. keys not aligned with ids).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// SQLite database error.
    #[error("SQLite error: {0}")]
    Sqlite(String),
}

impl MetadataError {
    /// Whether this is the "no data" sentinel rather than a fault.
    pub fn is_no_data(&self) -> bool {
        matches!(self, MetadataError::NoData)
    }
}

impl From<rusqlite::Error> for MetadataError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => MetadataError::NoData,
            other => MetadataError::Sqlite(other.to_string()),
        }
    }
}
