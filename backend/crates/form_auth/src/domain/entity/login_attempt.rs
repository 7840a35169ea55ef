//! Login Attempt Entity
//!
//! One submission of the login form. Lives for a single request.

use platform::password::ClearTextPassword;

#[derive(Debug)]
pub struct LoginAttempt {
    pub username: String,
    pub password: ClearTextPassword,
    /// URL the user asked for before being challenged; opaque to the gate
    pub redirect_target: String,
}

impl LoginAttempt {
    /// Assemble an attempt from submitted form fields
    ///
    /// Returns `None` when the user name or password field is missing or
    /// empty. A missing redirect target becomes an empty string.
    pub fn from_fields(
        username: Option<String>,
        password: Option<String>,
        redirect_target: Option<String>,
    ) -> Option<Self> {
        let username = username.filter(|u| !u.is_empty())?;
        let password = ClearTextPassword::new(password?);
        if password.is_empty() {
            return None;
        }

        Some(Self {
            username,
            password,
            redirect_target: redirect_target.unwrap_or_default(),
        })
    }
}
