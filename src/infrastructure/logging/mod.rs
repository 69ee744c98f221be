//! Logging infrastructure
//!
//! File and console sinks for the dispatcher:
//! - Dated file naming and collision suffixes
//! - The active log file and its rotation monitor
//! - Line rendering and console coloring
//! - Crash capture and dumps
//! - The fallback channel for the logger's own failures

pub mod config;
pub mod console;
pub mod crash;
pub mod fallback;
pub mod format;
pub mod monitor;
pub mod naming;
pub mod panic_scope;
pub mod rotation;

pub use config::LoggerConfig;
pub use console::{MemoryConsole, TermConsole};
pub use crash::CrashRecorder;
pub use monitor::{MonitorHandle, RotationMonitor};
pub use rotation::{ActiveLogHandle, Rotated};
