//! One-way hashing of contact identifiers.
//!
//! Phone numbers, emails and third-party login ids are never stored in
//! plaintext. They are reduced to SHA-256 digests so that two users holding
//! the same contact can be matched without either side revealing it.

use sha2::{Digest, Sha256};

/// Hash a contact identifier.
///
/// # Arguments
/// * `value` - Plaintext identifier
///
/// # Returns
/// 64-character lowercase hex string (256 bits).
pub fn hash_identity(value: &str) -> String {
    let mut hasher: Sha256 = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash an optional contact identifier; absence propagates.
///
/// # Arguments
/// * `value` - Plaintext identifier, if the identity provider supplied one
pub fn hash_optional_identity(value: Option<&str>) -> Option<String> {
    value.map(hash_identity)
}

/// Deterministic contact hasher.
///
/// Stateless; exists so callers can hold the hashing capability as a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher;

impl IdentityHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }

    /// Hash a contact identifier.
    ///
    /// # Arguments
    /// * `value` - Plaintext identifier
    pub fn hash(&self, value: &str) -> String {
        hash_identity(value)
    }

    /// Hash an optional contact identifier.
    ///
    /// # Arguments
    /// * `value` - Plaintext identifier, if present
    pub fn hash_opt(&self, value: Option<&str>) -> Option<String> {
        hash_optional_identity(value)
    }
}
