//! Configuration management infrastructure
//!
//! Layered configuration using figment:
//! - Programmatic defaults
//! - `ROTOLOG_*` environment overrides
//! - Validation

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
