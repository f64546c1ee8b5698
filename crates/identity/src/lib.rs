//! Caller identity for photoshare.
//!
//! Token verification itself is delegated to an [`IdentityVerifier`]; this
//! crate turns an inbound `Authorization` header into a typed
//! [`RequestContext`] carrying the verified subject, the raw bearer token
//! (needed for storage federation) and the caller's hashed contact
//! identifiers.

mod bearer;
mod claims;
mod context;
mod error;
mod verifier;

pub use bearer::bearer_token;
pub use claims::ProviderIdentities;
pub use context::{authenticate, RequestContext};
pub use error::IdentityError;
pub use verifier::{ClaimIssuer, IdentityVerifier, VerifiedIdentity};
