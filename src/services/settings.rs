use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::domain::models::Severity;

/// Runtime switches read on every emission.
///
/// Updates are rare and idempotent, so relaxed atomics are enough; the
/// prefix sits behind a lock because it is a string.
#[derive(Debug)]
pub struct Settings {
    threshold: AtomicU8,
    console_enabled: AtomicBool,
    console_prefix: RwLock<String>,
}

impl Settings {
    pub fn new(threshold: Severity, console_enabled: bool, console_prefix: String) -> Self {
        Self {
            threshold: AtomicU8::new(threshold as u8),
            console_enabled: AtomicBool::new(console_enabled),
            console_prefix: RwLock::new(console_prefix),
        }
    }

    pub fn threshold(&self) -> Severity {
        Severity::from_u8(self.threshold.load(Ordering::Relaxed))
    }

    pub fn set_threshold(&self, threshold: Severity) {
        self.threshold.store(threshold as u8, Ordering::Relaxed);
    }

    pub fn console_enabled(&self) -> bool {
        self.console_enabled.load(Ordering::Relaxed)
    }

    pub fn set_console_enabled(&self, enabled: bool) {
        self.console_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn console_prefix(&self) -> String {
        self.console_prefix
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_console_prefix(&self, prefix: &str) {
        let mut current = self
            .console_prefix
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        prefix.clone_into(&mut current);
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Severity::All, true, String::new())
    }
}
