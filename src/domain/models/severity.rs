//! Severity levels and the threshold filter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::LogError;

/// Severity of a log record.
///
/// Variants are ordered from most permissive to most severe, so thresholds
/// compare directly with `<=`.
///
/// # Examples
///
/// ```
/// use rotolog::Severity;
///
/// assert!(Severity::Fatal > Severity::Warn);
/// assert!(Severity::All < Severity::Debug);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    /// Threshold-only sentinel meaning "emit everything"; never attached to a record
    #[default]
    All = 0,
    /// Diagnostic detail useful during development
    Debug = 1,
    /// Normal operational messages
    Info = 2,
    /// Potentially problematic situations
    #[serde(alias = "warning")]
    Warn = 3,
    /// Failure conditions
    Error = 4,
    /// Unrecoverable conditions
    Fatal = 5,
}

impl Severity {
    /// Every severity, in ascending order.
    pub const ALL_LEVELS: [Self; 6] = [
        Self::All,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Upper-case name used in rendered lines.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Inverse of `self as u8`. Out-of-range values fall back to `All`.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Warn,
            4 => Self::Error,
            5 => Self::Fatal,
            _ => Self::All,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            _ => Err(LogError::InvalidSeverity(s.to_string())),
        }
    }
}

/// Decide whether a record at `record` severity passes `threshold`.
#[inline]
pub fn should_emit(record: Severity, threshold: Severity) -> bool {
    threshold <= record
}
