//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod advisory;
pub mod config;
pub mod error;
pub mod jiffybox;
pub mod lifecycle;
pub mod preset;
pub mod protected;

pub use config::{JiffyConfig, Overrides, Profile, Settings};
pub use error::JiffyError;
pub use jiffybox::{ApiResponse, BoxId, BoxStatus, CreateSpec, JiffyBox, Transition};
pub use lifecycle::PollPolicy;
pub use preset::PresetScript;
pub use protected::ProtectedIds;
