//! Application Layer
//!
//! Configuration, runtime settings and the gate use case.

pub mod authenticate;
pub mod config;
pub mod settings;

// Re-exports
pub use authenticate::{
    AuthenticationGate, CookieInstruction, GateAction, GateDecision, GateState, RenderedPage,
};
pub use config::{GateConfig, SameSite};
pub use settings::{GateSettings, GateSettingsHandle};
