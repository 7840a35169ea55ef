//! Form DTOs
//!
//! Field names are the ones the login page posts.

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::application::config::{PASSWORD_FIELD, REDIRECT_FIELD, USERNAME_FIELD};

// ============================================================================
// Login
// ============================================================================

/// Login form body (`application/x-www-form-urlencoded`)
#[derive(Default, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct LoginForm {
    pub j_username: Option<String>,
    pub j_password: Option<String>,
    pub j_redirect: Option<String>,
}

impl LoginForm {
    /// Parse a buffered body; `None` if it is not a form
    pub fn from_bytes(body: &[u8]) -> Option<Self> {
        serde_urlencoded::from_bytes(body)
            .inspect_err(|e| tracing::debug!(error = %e, "Login body is not a form"))
            .ok()
    }

    /// Look a field up by its wire name
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            USERNAME_FIELD => self.j_username.as_deref(),
            PASSWORD_FIELD => self.j_password.as_deref(),
            REDIRECT_FIELD => self.j_redirect.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("j_username", &self.j_username)
            .field("j_password", &self.j_password.as_ref().map(|_| "[REDACTED]"))
            .field("j_redirect", &self.j_redirect)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let form =
            LoginForm::from_bytes(b"j_username=alice&j_password=p%40ss+word&j_redirect=%2Fhome%3Fx%3D1")
                .unwrap();
        assert_eq!(form.field("j_username"), Some("alice"));
        assert_eq!(form.field("j_password"), Some("p@ss word"));
        assert_eq!(form.field("j_redirect"), Some("/home?x=1"));
        assert_eq!(form.field("other"), None);
    }

    #[test]
    fn test_missing_and_unknown_fields() {
        let form = LoginForm::from_bytes(b"j_username=alice&remember=on").unwrap();
        assert_eq!(form.field("j_password"), None);
        assert_eq!(form.field("j_redirect"), None);
    }

    #[test]
    fn test_debug_hides_password() {
        let form = LoginForm::from_bytes(b"j_username=alice&j_password=hunter2").unwrap();
        assert!(!format!("{:?}", form).contains("hunter2"));
    }
}
