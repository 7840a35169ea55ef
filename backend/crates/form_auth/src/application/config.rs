//! Application Configuration
//!
//! Static configuration for the gate. The URL patterns and the secret are
//! only the initial values: at runtime they live in
//! [`GateSettingsHandle`](crate::application::settings::GateSettingsHandle).

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::domain::value_object::{AuthSecret, DEFAULT_EXCLUDE_PATTERN};
use crate::error::{GateError, GateResult};

/// Context-relative path the login form posts to
pub const LOGIN_ACTION: &str = "/j_security_check";
pub const USERNAME_FIELD: &str = "j_username";
pub const PASSWORD_FIELD: &str = "j_password";
pub const REDIRECT_FIELD: &str = "j_redirect";

/// Prefix of every environment variable read by [`GateConfig::from_env`]
pub const ENV_PREFIX: &str = "FORM_AUTH_";

/// Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Mount prefix of the protected application ("" for the root)
    pub context_path: String,
    /// Context-relative path of the login form target
    pub login_action: String,
    pub username_cookie_name: String,
    pub proof_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Only POST requests count as login submissions
    pub require_post: bool,
    /// Upper bound on a buffered login form body
    pub max_form_bytes: usize,
    pub include_pattern: Option<String>,
    pub exclude_pattern: Option<String>,
    /// `None` generates a random secret at startup
    pub secret: Option<AuthSecret>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            context_path: String::new(),
            login_action: LOGIN_ACTION.to_string(),
            username_cookie_name: "__fa_user".to_string(),
            proof_cookie_name: "__fa_proof".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            require_post: true,
            max_form_bytes: 16 * 1024,
            include_pattern: None,
            exclude_pattern: Some(DEFAULT_EXCLUDE_PATTERN.to_string()),
            secret: None,
        }
    }
}

impl GateConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Read `FORM_AUTH_*` variables from the process environment
    pub fn from_env() -> GateResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a key lookup, starting from the defaults
    ///
    /// Recognised keys (without the `FORM_AUTH_` prefix): `CONTEXT_PATH`,
    /// `LOGIN_ACTION`, `USERNAME_COOKIE`, `PROOF_COOKIE`, `COOKIE_SECURE`,
    /// `COOKIE_SAME_SITE`, `REQUIRE_POST`, `MAX_FORM_BYTES`,
    /// `INCLUDE_PATTERN`, `EXCLUDE_PATTERN` and `SECRET`. An empty pattern
    /// variable clears that pattern.
    pub fn from_lookup<F>(lookup: F) -> GateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut config = Self::default();

        if let Some(value) = get("CONTEXT_PATH") {
            config.context_path = normalize_context_path(&value);
        }
        if let Some(value) = get("LOGIN_ACTION") {
            if !value.starts_with('/') {
                return Err(invalid("LOGIN_ACTION", "must start with '/'"));
            }
            config.login_action = value;
        }
        if let Some(value) = get("USERNAME_COOKIE") {
            config.username_cookie_name = cookie_name("USERNAME_COOKIE", value)?;
        }
        if let Some(value) = get("PROOF_COOKIE") {
            config.proof_cookie_name = cookie_name("PROOF_COOKIE", value)?;
        }
        if let Some(value) = get("COOKIE_SECURE") {
            config.cookie_secure = parse_bool("COOKIE_SECURE", &value)?;
        }
        if let Some(value) = get("COOKIE_SAME_SITE") {
            config.cookie_same_site = SameSite::parse(&value)
                .ok_or_else(|| invalid("COOKIE_SAME_SITE", "expected strict, lax or none"))?;
        }
        if let Some(value) = get("REQUIRE_POST") {
            config.require_post = parse_bool("REQUIRE_POST", &value)?;
        }
        if let Some(value) = get("MAX_FORM_BYTES") {
            config.max_form_bytes = value
                .trim()
                .parse()
                .map_err(|_| invalid("MAX_FORM_BYTES", "expected a byte count"))?;
        }
        if let Some(value) = get("INCLUDE_PATTERN") {
            config.include_pattern = Some(value).filter(|v| !v.is_empty());
        }
        if let Some(value) = get("EXCLUDE_PATTERN") {
            config.exclude_pattern = Some(value).filter(|v| !v.is_empty());
        }
        if let Some(value) = get("SECRET") {
            config.secret = Some(AuthSecret::new(value)?);
        }

        if config.username_cookie_name == config.proof_cookie_name {
            return Err(invalid("PROOF_COOKIE", "must differ from USERNAME_COOKIE"));
        }

        Ok(config)
    }

    /// Absolute URL path of the login form target
    pub fn login_url(&self) -> String {
        format!("{}{}", self.context_path, self.login_action)
    }

    /// Path attribute for the gate cookies
    pub fn cookie_path(&self) -> &str {
        if self.context_path.is_empty() {
            "/"
        } else {
            &self.context_path
        }
    }
}

/// `"/"` and `""` both mean the root context; trailing slashes are dropped
pub fn normalize_context_path(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn invalid(name: &str, message: &str) -> GateError {
    GateError::InvalidSetting {
        key: format!("{ENV_PREFIX}{name}"),
        message: message.to_string(),
    }
}

fn parse_bool(name: &str, value: &str) -> GateResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, "expected true or false")),
    }
}

fn cookie_name(name: &str, value: String) -> GateResult<String> {
    let valid = !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if valid {
        Ok(value)
    } else {
        Err(invalid(name, "not a valid cookie name"))
    }
}
