//! Crash report captured from a panic inside a guarded scope.

use chrono::{DateTime, Local};
use std::any::Any;

const RULE: &str =
    "===============================================================================";

/// Everything written into a single crash dump.
#[derive(Debug, Clone)]
pub struct CrashReport {
    /// Panic payload rendered as text
    pub value: String,
    /// `file:line` where the panic was raised, when known
    pub location: Option<String>,
    /// Stack trace captured at the point of the panic
    pub backtrace: String,
    pub timestamp: DateTime<Local>,
}

impl CrashReport {
    /// Render the delimited dump block.
    pub fn render(&self) -> String {
        let location = self.location.as_deref().unwrap_or("unknown");
        format!(
            "\n{RULE}\nEXCEPTION: {:?}\nLOCATION: {location}\n{RULE}\n{}",
            self.value, self.backtrace
        )
    }
}

/// Extract a printable value from a panic payload.
pub fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
