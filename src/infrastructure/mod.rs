//! Infrastructure layer module
//!
//! Adapters that touch the outside world:
//! - Log files, rotation and crash dumps
//! - Console output
//! - Configuration loading
//!
//! Implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
