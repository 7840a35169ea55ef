//! Form Authentication Gate
//!
//! Clean Architecture structure:
//! - `domain/` - URL patterns, identity proofs, collaborator traits
//! - `application/` - Configuration, runtime settings, the gate use case
//! - `infra/` - Credential verifier implementations
//! - `presentation/` - Axum middleware, form DTO, default pages
//!
//! ## Features
//! - Login page served in place of any protected resource
//! - Stateless identity: a user-name cookie plus a SHA-256 proof bound to a
//!   server secret, so any instance sharing the secret can verify it
//! - Regular-expression include/exclude patterns for unprotected paths
//! - Patterns and secret replaceable at runtime
//!
//! ## Security Model
//! - Proofs are compared in constant time and cleared when they fail
//! - Rotating the secret logs every user out
//! - Failed logins get one fixed error page, whatever the cause
//! - Post-login redirects never leave the origin
//! - Proofs carry no expiry; they live as long as the secret does

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{
    AuthenticationGate, CookieInstruction, GateAction, GateConfig, GateDecision, GateSettings,
    GateSettingsHandle, GateState, RenderedPage,
};
pub use domain::{
    AccessPolicy, AuthSecret, AuthenticatedUser, CredentialVerifier, GateRequest, LoginPage,
    PageRenderer, Principal, SecurityConstraint, UrlPattern,
};
pub use error::{GateError, GateResult, PatternKind, VerifierError};
pub use infra::{MemoryRealm, PrivateRealm};
pub use presentation::{FormAuthState, HtmlPages, form_auth_gate, protect};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
