use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::crash::DEFAULT_CRASH_DIR;
use super::rotation::DEFAULT_MAX_FILE_SIZE;
use crate::domain::models::Severity;

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Root directory for dated log subdirectories
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Prefix of every log file name
    #[serde(default = "default_base_name")]
    pub base_name: String,

    /// Minimum severity written
    #[serde(default)]
    pub threshold: Severity,

    /// Mirror records to stderr
    #[serde(default = "default_true")]
    pub console: bool,

    /// Tag shown as `@prefix` on console lines
    #[serde(default)]
    pub console_prefix: String,

    /// Rotate once the active file reaches this many bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Seconds between rotation checks
    #[serde(default = "default_monitor_interval_secs")]
    pub monitor_interval_secs: u64,

    /// Root directory for crash dumps
    #[serde(default = "default_crash_dir")]
    pub crash_dir: PathBuf,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            base_name: default_base_name(),
            threshold: Severity::All,
            console: true,
            console_prefix: String::new(),
            max_file_size: default_max_file_size(),
            monitor_interval_secs: default_monitor_interval_secs(),
            crash_dir: default_crash_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./log")
}

fn default_base_name() -> String {
    "app".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_monitor_interval_secs() -> u64 {
    10
}

fn default_crash_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CRASH_DIR)
}
