//! Private Realm
//!
//! Composite realm for a private site: asks each inner realm in turn and
//! only admits principals holding the site's required role. Every resource
//! is covered by a single constraint on that role.

use platform::password::ClearTextPassword;

use crate::domain::entity::{Principal, SecurityConstraint};
use crate::domain::repository::{AccessPolicy, CredentialVerifier};
use crate::error::VerifierError;

/// Role required when none is configured
pub const DEFAULT_REQUIRED_ROLE: &str = "user";

pub struct PrivateRealm<V> {
    realms: Vec<V>,
    constraint: SecurityConstraint,
}

impl<V> PrivateRealm<V> {
    /// Wrap `realms`, requiring [`DEFAULT_REQUIRED_ROLE`]
    pub fn new(realms: Vec<V>) -> Self {
        Self::with_required_role(realms, DEFAULT_REQUIRED_ROLE)
    }

    pub fn with_required_role(realms: Vec<V>, role: impl Into<String>) -> Self {
        Self {
            realms,
            constraint: SecurityConstraint::all_resources(role),
        }
    }

    pub fn required_role(&self) -> &str {
        self.constraint
            .roles
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_REQUIRED_ROLE)
    }
}

impl<V> AccessPolicy for PrivateRealm<V> {
    fn find_security_constraints(&self, path: &str) -> Vec<SecurityConstraint> {
        if self.constraint.applies_to(path) {
            vec![self.constraint.clone()]
        } else {
            Vec::new()
        }
    }
}

impl<V> CredentialVerifier for PrivateRealm<V>
where
    V: CredentialVerifier + Sync,
{
    async fn authenticate(
        &self,
        username: &str,
        password: &ClearTextPassword,
    ) -> Result<Option<Principal>, VerifierError> {
        let mut last_error = None;

        for realm in &self.realms {
            match realm.authenticate(username, password).await {
                Ok(Some(principal)) => {
                    let admitted = self
                        .find_security_constraints("/")
                        .iter()
                        .all(|constraint| constraint.is_satisfied_by(&principal));

                    if !admitted {
                        tracing::warn!(
                            username,
                            required_role = self.required_role(),
                            "Authenticated user lacks required role"
                        );
                        return Ok(None);
                    }
                    return Ok(Some(principal));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Inner realm failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        last_error.map_or(Ok(None), Err)
    }
}
