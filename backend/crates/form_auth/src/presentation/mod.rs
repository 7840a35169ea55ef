//! Presentation Layer
//!
//! Axum middleware, form DTO, default pages and router helper.

pub mod dto;
pub mod middleware;
pub mod pages;
pub mod router;

pub use dto::LoginForm;
pub use middleware::{FormAuthState, form_auth_gate};
pub use pages::HtmlPages;
pub use router::protect;
