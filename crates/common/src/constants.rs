//! Shared constants used across photoshare crates.

/// Minimum billable size of a single stored representation (128KB).
/// Smaller objects are billed as if they were this size.
pub const MIN_BILLABLE_REPRESENTATION_BYTES: u64 = 128 * 1024;

/// Asset type recorded when the caller does not supply one.
pub const DEFAULT_ASSET_TYPE: &str = "photo";

/// Marker in an object key identifying the original representation.
pub const ORIGINAL_KEY_MARKER: &str = "_original";

/// Marker in an object key identifying the reduced (low) representation.
pub const LOW_KEY_MARKER: &str = "_low";

/// Schema version stamped on newly registered users.
pub const USER_SCHEMA_VERSION: &str = "1";
