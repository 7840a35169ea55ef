//! Form Auth Error Types
//!
//! Errors raised while configuring the gate or talking to an identity
//! backend. None of them is ever rendered to a client: a failed login always
//! produces the fixed error page.

use thiserror::Error;

/// Gate result type alias
pub type GateResult<T> = Result<T, GateError>;

/// Which of the two URL patterns an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Include,
    Exclude,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternKind::Include => f.write_str("include"),
            PatternKind::Exclude => f.write_str("exclude"),
        }
    }
}

/// Configuration-time errors
#[derive(Debug, Error)]
pub enum GateError {
    /// Regular expression did not compile
    #[error("Invalid {kind} URL pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: PatternKind,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Secret was supplied but empty
    #[error("Authentication secret must not be empty")]
    EmptySecret,

    /// Configuration value could not be interpreted
    #[error("Invalid setting {key}: {message}")]
    InvalidSetting { key: String, message: String },

    /// Realm entry could not be parsed
    #[error("Invalid realm entry #{index}: {reason}")]
    InvalidRealmEntry { index: usize, reason: String },

    /// Stored password hash is unusable
    #[error("Password hash error: {0}")]
    Password(#[from] platform::password::PasswordHashError),
}

/// Identity backend failure
///
/// Distinct from a rejected login: the backend could not answer at all.
/// The gate denies in both cases.
#[derive(Debug, Clone, Error)]
pub enum VerifierError {
    #[error("Identity backend unavailable: {0}")]
    Unavailable(String),

    #[error("Identity backend error: {0}")]
    Internal(String),
}

impl GateError {
    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            GateError::InvalidPattern { kind, pattern, .. } => {
                tracing::warn!(%kind, %pattern, error = %self, "Rejected URL pattern");
            }
            GateError::EmptySecret => {
                tracing::warn!("Rejected empty authentication secret");
            }
            GateError::InvalidSetting { key, .. } => {
                tracing::warn!(%key, error = %self, "Rejected setting");
            }
            GateError::InvalidRealmEntry { .. } | GateError::Password(_) => {
                tracing::error!(error = %self, "Realm configuration error");
            }
        }
    }
}
