use std::path::PathBuf;
use thiserror::Error;

/// Errors raised inside the logging core.
///
/// Only [`LogError::Io`] from the initial file open and
/// [`LogError::InvalidConfig`] ever reach a caller; every other variant is
/// converted into a fallback report at the emission boundary.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to format log message")]
    Format(#[from] std::fmt::Error),

    #[error("Panic while logging: {0}")]
    Panic(String),

    #[error("Log file handle is closed")]
    Closed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid severity: {0}. Must be one of: all, debug, info, warn, error, fatal")]
    InvalidSeverity(String),
}

impl LogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = LogError> = std::result::Result<T, E>;
