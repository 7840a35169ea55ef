//! Infrastructure Layer
//!
//! Credential verifier implementations.

pub mod memory_realm;
pub mod private_realm;

pub use memory_realm::MemoryRealm;
pub use private_realm::{DEFAULT_REQUIRED_ROLE, PrivateRealm};
