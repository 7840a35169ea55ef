//! Value Object Module

pub mod auth_secret;
pub mod identity_proof;
pub mod url_pattern;

pub use auth_secret::AuthSecret;
pub use identity_proof::IdentityProof;
pub use url_pattern::{DEFAULT_EXCLUDE_PATTERN, UrlPattern};
