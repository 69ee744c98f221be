//! Port trait definitions
//!
//! The logging core depends only on these traits for time, filesystem
//! queries and console output, so tests can substitute deterministic
//! implementations.

pub mod clock;
pub mod console;
pub mod file_probe;

pub use clock::{Clock, ManualClock, SystemClock};
pub use console::ConsoleWriter;
pub use file_probe::{FileProbe, OsFileProbe};
