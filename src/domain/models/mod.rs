//! Domain models: severities, records and crash reports.

pub mod crash;
pub mod record;
pub mod severity;

pub use crash::CrashReport;
pub use record::Record;
pub use severity::{should_emit, Severity};
