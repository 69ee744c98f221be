//! Common test utilities for integration tests
//!
//! Provides logger fixtures and helpers for reading back the log tree.

#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use rotolog::{ConsoleWriter, Logger, LoggerBuilder, ManualClock, MemoryConsole};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A logger wired to an in-memory console inside its own temp directory.
pub struct TestLogger {
    pub temp_dir: TempDir,
    pub console: Arc<MemoryConsole>,
    pub logger: Logger,
}

impl TestLogger {
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// The instant every manual clock in these tests starts from.
pub fn start_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 10, 19, 23, 59, 50).unwrap()
}

/// Builder with an in-memory console and crash dumps kept under `root`.
pub fn builder(root: &Path, console: &Arc<MemoryConsole>) -> LoggerBuilder {
    Logger::builder()
        .console(Arc::clone(console) as Arc<dyn ConsoleWriter>)
        .crash_dir(root.join("exceptions"))
}

/// Logger on the system clock with a long monitor interval.
pub fn test_logger() -> TestLogger {
    test_logger_with(|builder| builder.check_interval(Duration::from_secs(3600)))
}

/// Logger whose builder is customized by `configure`.
pub fn test_logger_with(configure: impl FnOnce(LoggerBuilder) -> LoggerBuilder) -> TestLogger {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let console = Arc::new(MemoryConsole::new());
    let logger = configure(builder(temp_dir.path(), &console)).build();
    TestLogger {
        temp_dir,
        console,
        logger,
    }
}

/// A manual clock shared between the test and the logger.
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start_time()))
}

/// Every `.log` file under `dir`, recursively, sorted by path.
pub fn log_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if path.is_dir() {
            files.extend(log_files(&path));
        } else if path.extension().is_some_and(|ext| ext == "log") {
            files.push(path);
        }
    }
    files.sort();
    files
}

/// Every line of every `.log` file under `dir`.
pub fn all_lines(dir: &Path) -> Vec<String> {
    log_files(dir)
        .iter()
        .flat_map(|path| {
            std::fs::read_to_string(path)
                .expect("Failed to read log file")
                .lines()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Wait for a condition to be true with timeout
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}
