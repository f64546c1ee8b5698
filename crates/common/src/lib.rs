//! Shared types and utilities for photoshare.
//!
//! This crate provides common functionality used across all photoshare crates:
//! - One-way hashing of contact identifiers
//! - Storage billing and asset naming constants
//! - Caller-input validation helpers and the shared validation error

pub mod constants;
pub mod error;
pub mod hash;
pub mod validate;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::ValidationError;
pub use hash::{hash_identity, hash_optional_identity, IdentityHasher};
pub use validate::{require_dimensions, require_non_empty, require_uuid};
