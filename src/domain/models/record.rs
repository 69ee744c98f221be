//! Ephemeral log record.

use chrono::{DateTime, Local};

use super::severity::Severity;

/// A single log record, rendered immediately into sink-specific lines and discarded.
#[derive(Debug, Clone)]
pub struct Record {
    pub severity: Severity,
    pub message: String,
    /// Source file of the call site, as reported by the compiler
    pub file: &'static str,
    pub line: u32,
    pub timestamp: DateTime<Local>,
}

impl Record {
    /// Build a record attributed to `file:line`.
    pub const fn new(
        severity: Severity,
        message: String,
        file: &'static str,
        line: u32,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            severity,
            message,
            file,
            line,
            timestamp,
        }
    }

    /// File name of the call site with any directory stripped.
    pub fn short_file(&self) -> &'static str {
        short_file_name(self.file)
    }
}

/// Strip the directory part of a source path, accepting both separators.
pub fn short_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
