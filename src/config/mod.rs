//! Configuration module for the build orchestrator
//!
//! Provides types and parsing for `sprout.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config, CliOverrides, ConfigError};
pub use schema::*;
