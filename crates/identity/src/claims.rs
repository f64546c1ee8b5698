//! Contact identities asserted by the identity provider.

use photoshare_common::IdentityHasher;
use photoshare_model::HashedContacts;
use serde_json::Value;

/// Plaintext contact identities taken from verified token claims.
///
/// These only live for the duration of a request; [`ProviderIdentities::hashed`]
/// is the form that gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderIdentities {
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Sign in with Apple id.
    pub apple_id: Option<String>,
}

impl ProviderIdentities {
    /// Read identities from decoded token claims.
    ///
    /// Looks under `firebase.identities`, where each provider maps to an array
    /// of identifiers; the first entry of `phone`, `email` and `apple.com` is
    /// used. Missing or malformed entries are treated as absent.
    pub fn from_claims(claims: &Value) -> Self {
        let identities: Option<&Value> = claims.get("firebase").and_then(|f| f.get("identities"));
        let first = |provider: &str| -> Option<String> {
            identities?
                .get(provider)?
                .as_array()?
                .first()?
                .as_str()
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            phone: first("phone"),
            email: first("email"),
            apple_id: first("apple.com"),
        }
    }

    /// Hash every present identity.
    pub fn hashed(&self, hasher: &IdentityHasher) -> HashedContacts {
        HashedContacts {
            phone: hasher.hash_opt(self.phone.as_deref()),
            email: hasher.hash_opt(self.email.as_deref()),
            apple_id: hasher.hash_opt(self.apple_id.as_deref()),
        }
    }
}
