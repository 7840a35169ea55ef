//! Principal Entity

/// Identity returned by a credential verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(
        username: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// User name proven by the cookie pair, stored in request extensions
/// for downstream handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_role() {
        let principal = Principal::new("alice", ["user", "admin"]);
        assert!(principal.has_role("user"));
        assert!(principal.has_role("admin"));
        assert!(!principal.has_role("auditor"));
    }
}
