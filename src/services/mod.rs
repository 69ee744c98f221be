//! Service layer
//!
//! The [`Logger`] dispatcher, its verbose handle, the process-wide facade
//! and the tracing bridge.

pub mod bridge;
mod emission;
pub mod global;
pub mod logger;
pub mod settings;
pub mod verbose;

pub use bridge::{init_tracing_bridge, RotologLayer};
pub use logger::{Logger, LoggerBuilder};
pub use settings::Settings;
pub use verbose::Verbose;
