//! Ember Core - shared engine utilities
//!
//! This crate provides the foundational pieces used around the ECS runtime:
//! - Frame time tracking for systems that need delta time
//! - Persisted engine configuration (window and time settings)

pub mod config;
pub mod time;

pub use config::{ConfigError, EngineConfig, WindowConfig};
pub use time::{Time, TimeConfig};
