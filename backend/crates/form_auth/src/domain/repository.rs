//! Collaborator Traits
//!
//! Identity backends and access policies live outside the gate. The gate
//! only sees these interfaces; implementations are in the infrastructure
//! layer.

use platform::password::ClearTextPassword;

use crate::domain::entity::{Principal, SecurityConstraint};
use crate::error::VerifierError;

/// Identity source ("realm") that checks a user name / password pair
#[trait_variant::make(CredentialVerifier: Send)]
pub trait LocalCredentialVerifier {
    /// `Ok(Some)` on success, `Ok(None)` when the credentials are rejected,
    /// `Err` when the backend cannot answer
    async fn authenticate(
        &self,
        username: &str,
        password: &ClearTextPassword,
    ) -> Result<Option<Principal>, VerifierError>;
}

/// Maps resource paths to the roles required to reach them
pub trait AccessPolicy {
    fn find_security_constraints(&self, path: &str) -> Vec<SecurityConstraint>;
}
