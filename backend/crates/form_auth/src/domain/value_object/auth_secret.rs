//! Authentication Secret Value Object
//!
//! Server-held key mixed into every identity proof. Anyone holding it can
//! forge a proof for any user name, so it is zeroized on drop and never
//! printed.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{GateError, GateResult};

/// Random secrets are this many bytes of OS entropy, hex encoded
pub const RANDOM_SECRET_BYTES: usize = 32;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuthSecret(String);

impl AuthSecret {
    /// Operator-supplied secret
    pub fn new(value: impl Into<String>) -> GateResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(GateError::EmptySecret);
        }
        Ok(Self(value))
    }

    /// Fresh secret for this process; proofs minted under it die with it
    pub fn random() -> Self {
        Self(platform::crypto::random_hex(RANDOM_SECRET_BYTES))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthSecret").field(&"[REDACTED]").finish()
    }
}
