//! Rotolog - leveled logging to daily, size-bounded log files
//!
//! Rotolog writes severity-tagged records to
//! `{dir}/{YYYY-MM-DD}/{name}.{HH}_{MM}_{SS}.log`, optionally mirrors them to a
//! colored console, rotates the file on a new day, a size limit or deletion,
//! and turns panics inside guarded scopes into crash dump files.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): severities, records, crash reports and the
//!   clock/filesystem/console ports
//! - **Infrastructure Layer** (`infrastructure`): the active log file, its
//!   rotation monitor, rendering, crash dumps and configuration loading
//! - **Service Layer** (`services`): the [`Logger`] dispatcher, the
//!   process-wide facade and the tracing bridge
//!
//! # Example
//!
//! ```rust,no_run
//! use rotolog::{global, Severity};
//!
//! fn main() -> anyhow::Result<()> {
//!     global::init("./log", "server")?;
//!     global::set_threshold(Severity::Info);
//!
//!     rotolog::infof!("listening on port {}", 8080);
//!     rotolog::warnln!("slow peer", "10.0.0.7");
//!
//!     global::catch_crash(|| {
//!         // a panic here is written to ./exceptions/ instead of unwinding further
//!     });
//!
//!     global::shutdown();
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
mod macros;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::error::{LogError, Result};
pub use domain::models::{should_emit, CrashReport, Record, Severity};
pub use domain::ports::{Clock, ConsoleWriter, FileProbe, ManualClock, OsFileProbe, SystemClock};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::{LoggerConfig, MemoryConsole, TermConsole};
pub use services::{global, Logger, LoggerBuilder, RotologLayer, Verbose};
