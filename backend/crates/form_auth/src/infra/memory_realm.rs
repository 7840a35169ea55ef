//! In-Memory Realm
//!
//! Users held in process memory with Argon2 PHC password hashes. Loaded
//! from a compact text form:
//!
//! ```text
//! alice:$argon2id$v=19$m=19456,t=2,p=1$...:user,admin;bob:$argon2id$...:user
//! ```
//!
//! Entries are separated by `;`, fields by `:`. The role list may be empty.

use std::collections::HashMap;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::domain::entity::Principal;
use crate::domain::repository::CredentialVerifier;
use crate::error::{GateError, GateResult, VerifierError};

struct StoredUser {
    password: HashedPassword,
    roles: Vec<String>,
}

/// Static user table
#[derive(Default)]
pub struct MemoryRealm {
    users: HashMap<String, StoredUser>,
}

impl MemoryRealm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `name:phc:roles;...` form
    pub fn parse(entries: &str) -> GateResult<Self> {
        let mut realm = Self::new();

        for (index, entry) in entries
            .split(';')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .enumerate()
        {
            let mut fields = entry.splitn(3, ':');
            let username = fields.next().unwrap_or_default().trim();
            let hash = fields.next().map(str::trim).unwrap_or_default();
            let roles = fields.next().unwrap_or_default();

            if username.is_empty() {
                return Err(invalid_entry(index, "missing user name"));
            }
            if hash.is_empty() {
                return Err(invalid_entry(index, "missing password hash"));
            }
            if realm.users.contains_key(username) {
                return Err(invalid_entry(index, "duplicate user name"));
            }

            let password = HashedPassword::from_phc_string(hash)?;
            let roles = roles
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();

            realm
                .users
                .insert(username.to_string(), StoredUser { password, roles });
        }

        tracing::debug!(users = realm.users.len(), "Memory realm loaded");

        Ok(realm)
    }

    /// Add a user, replacing any previous entry with the same name
    pub fn with_user(
        mut self,
        username: impl Into<String>,
        password: HashedPassword,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.users.insert(
            username.into(),
            StoredUser {
                password,
                roles: roles.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn invalid_entry(index: usize, reason: &str) -> GateError {
    GateError::InvalidRealmEntry {
        index,
        reason: reason.to_string(),
    }
}

impl CredentialVerifier for MemoryRealm {
    async fn authenticate(
        &self,
        username: &str,
        password: &ClearTextPassword,
    ) -> Result<Option<Principal>, VerifierError> {
        let Some(user) = self.users.get(username) else {
            tracing::debug!(username, "Unknown user");
            return Ok(None);
        };

        let hash = user.password.clone();
        let password = ClearTextPassword::new(password.expose());
        let verified = tokio::task::spawn_blocking(move || hash.verify(&password))
            .await
            .map_err(|e| VerifierError::Internal(e.to_string()))?;

        if !verified {
            return Ok(None);
        }

        Ok(Some(Principal::new(username, user.roles.iter().cloned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(password: &str) -> HashedPassword {
        ClearTextPassword::new(password).hash().unwrap()
    }

    #[tokio::test]
    async fn test_authenticate() {
        let realm = MemoryRealm::new().with_user("alice", hash("s3cret"), ["user", "admin"]);

        let principal = realm
            .authenticate("alice", &ClearTextPassword::new("s3cret"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(principal.username, "alice");
        assert!(principal.has_role("admin"));

        assert!(
            realm
                .authenticate("alice", &ClearTextPassword::new("wrong"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            realm
                .authenticate("mallory", &ClearTextPassword::new("s3cret"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_verification_yields_to_other_tasks() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let realm = MemoryRealm::new().with_user("alice", hash("s3cret"), ["user"]);
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

        let principal = realm
            .authenticate("alice", &ClearTextPassword::new("s3cret"))
            .await
            .unwrap();
        assert!(principal.is_some());
        // only runs if the hash was checked off the runtime thread
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_parse() {
        let alice = hash("s3cret");
        let bob = hash("hunter2");
        let entries = format!(
            "alice:{}:user, admin ; bob:{}: ;",
            alice.as_phc_string(),
            bob.as_phc_string()
        );

        let realm = MemoryRealm::parse(&entries).unwrap();
        assert_eq!(realm.len(), 2);

        let bob = realm
            .authenticate("bob", &ClearTextPassword::new("hunter2"))
            .await
            .unwrap()
            .unwrap();
        assert!(bob.roles.is_empty());

        let alice = realm
            .authenticate("alice", &ClearTextPassword::new("s3cret"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alice.roles, vec!["user".to_string(), "admin".to_string()]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(MemoryRealm::parse("").unwrap().is_empty());
        assert!(matches!(
            MemoryRealm::parse(":$argon2id$x"),
            Err(GateError::InvalidRealmEntry { index: 0, .. })
        ));
        assert!(matches!(
            MemoryRealm::parse("alice"),
            Err(GateError::InvalidRealmEntry { index: 0, .. })
        ));
        assert!(matches!(
            MemoryRealm::parse("alice:not-a-hash:user"),
            Err(GateError::Password(_))
        ));

        let phc = hash("pw");
        let duplicate = format!(
            "alice:{0}:user;alice:{0}:user",
            phc.as_phc_string()
        );
        assert!(matches!(
            MemoryRealm::parse(&duplicate),
            Err(GateError::InvalidRealmEntry { index: 1, .. })
        ));
    }
}
