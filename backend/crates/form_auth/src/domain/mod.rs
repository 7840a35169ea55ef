//! Domain Layer
//!
//! Contains value objects, entities, pure services and the traits of the
//! gate's collaborators.

pub mod entity;
pub mod page;
pub mod repository;
pub mod request;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{AuthenticatedUser, LoginAttempt, Principal, SecurityConstraint};
pub use page::{LoginPage, PageRenderer};
pub use repository::{AccessPolicy, CredentialVerifier};
pub use request::GateRequest;
pub use value_object::{AuthSecret, IdentityProof, UrlPattern};
