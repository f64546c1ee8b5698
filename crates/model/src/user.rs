//! User records and contact identifiers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hashed contact identifiers supplied by the identity provider.
///
/// Every field is a digest produced by the identity hasher, never plaintext.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedContacts {
    /// Hashed phone number.
    pub phone: Option<String>,
    /// Hashed email address.
    pub email: Option<String>,
    /// Hashed third-party login id.
    pub apple_id: Option<String>,
}

impl HashedContacts {
    /// Whether no contact identifier is present.
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none() && self.apple_id.is_none()
    }
}

/// Data required to register a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Identity provider subject the account is bound to.
    pub subject: String,
    /// Generated user id.
    pub user_id: String,
    /// Hashed contact identifiers.
    pub contacts: HashedContacts,
    /// Public key (plain).
    pub public_key: String,
    /// Private key, encrypted by the client.
    pub private_key: String,
    /// Schema version of the key material.
    pub schema_version: String,
}

/// A user as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// User id.
    pub id: String,
    /// Public key.
    pub public_key: String,
    /// Encrypted private key.
    pub private_key: String,
    /// Schema version of the key material.
    pub schema_version: String,
}

/// Result of resolving contacts against known users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResolution {
    /// Matched users: user id → public key.
    pub existing: HashMap<String, String>,
    /// Supplied identifiers that matched nobody.
    pub unmatched: Vec<String>,
}

impl ContactResolution {
    /// Whether nothing matched in any identifier space.
    pub fn has_no_matches(&self) -> bool {
        self.existing.is_empty()
    }
}
