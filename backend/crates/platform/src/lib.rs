//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256 hex digests, constant-time comparison)
//! - Password verification (Argon2id PHC strings)
//! - Cookie management
//! - Client identification

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod password;
