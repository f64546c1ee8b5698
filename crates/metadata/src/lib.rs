//! Metadata store for photoshare.
//!
//! The store holds the graph of users, groups, memberships, assets and the
//! album/sharing edges between assets and groups. It is consumed through the
//! [`MetadataStore`] trait; [`SqliteMetadataStore`] is the bundled backend.
//!
//! Every caller-scoped operation takes the caller's identity-provider subject
//! and only touches what that caller owns or is a member of. Lookups that find
//! nothing, and mutations whose scope matches nothing, report
//! [`MetadataError::NoData`] rather than a fault.

mod backend;
mod error;
mod sqlite;

pub use backend::MetadataStore;
pub use error::MetadataError;
pub use sqlite::SqliteMetadataStore;
