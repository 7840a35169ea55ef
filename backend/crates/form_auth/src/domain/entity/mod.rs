//! Entity Module

pub mod login_attempt;
pub mod principal;
pub mod security_constraint;

pub use login_attempt::LoginAttempt;
pub use principal::{AuthenticatedUser, Principal};
pub use security_constraint::SecurityConstraint;
