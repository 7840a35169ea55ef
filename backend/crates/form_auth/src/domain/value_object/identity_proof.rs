//! Identity Proof Value Object
//!
//! The two cookie values that stand in for a verified login.

/// Cookie pair minted after a successful login
///
/// `username_cookie` carries the cookie-safe encoding of the plaintext user
/// name; `proof_cookie` the lowercase hex digest binding it to the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProof {
    pub username_cookie: String,
    pub proof_cookie: String,
}

impl IdentityProof {
    pub fn new(username_cookie: impl Into<String>, proof_cookie: impl Into<String>) -> Self {
        Self {
            username_cookie: username_cookie.into(),
            proof_cookie: proof_cookie.into(),
        }
    }
}
