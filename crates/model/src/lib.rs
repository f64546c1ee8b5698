//! Data model for photoshare.
//!
//! Users own encrypted assets, organise them into groups and share them with
//! group members. Every key in this model (user private keys, group keys,
//! asset keys) is opaque: it is wrapped for a specific recipient by the client
//! and only ever distributed here, never used.

mod asset;
mod group;
mod size;
mod user;

pub use asset::{AssetRecord, NewAsset};
pub use group::{GroupAlbum, GroupRecord, MemberInvite, SharedAsset};
pub use size::{billable_size, decode_total_size, encode_total_size, total_billable_size, SizeMap};
pub use user::{ContactResolution, HashedContacts, NewUser, UserRecord};
