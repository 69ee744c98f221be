//! Crash dumps for panics caught in guarded scopes
//!
//! Dumps are written to `{dir}/{YYYY-MM-DD}/exceptions.{HH}_{MM}_{SS}[_N].log`,
//! independently of the rotating log, and echoed to the console whether or
//! not console logging is enabled.

use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::error;

use super::{fallback, naming, panic_scope};
use crate::domain::error::{LogError, Result};
use crate::domain::models::CrashReport;
use crate::domain::ports::{Clock, ConsoleWriter, FileProbe};

/// Default root of the crash dump tree, relative to the working directory.
pub const DEFAULT_CRASH_DIR: &str = "./exceptions";

/// File name prefix of crash dumps.
pub const CRASH_FILE_PREFIX: &str = "exceptions";

const MAX_NAME_ATTEMPTS: u32 = 64;

/// Writes crash dumps and runs closures under panic capture.
#[derive(Clone)]
pub struct CrashRecorder {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
    probe: Arc<dyn FileProbe>,
    console: Arc<dyn ConsoleWriter>,
}

impl CrashRecorder {
    pub fn new(
        dir: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
        probe: Arc<dyn FileProbe>,
        console: Arc<dyn ConsoleWriter>,
    ) -> Self {
        Self {
            dir: dir.into(),
            clock,
            probe,
            console,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `report` to a fresh dump file and mirror it to the console.
    pub fn record(&self, report: &CrashReport) -> Result<PathBuf> {
        let block = report.render();
        self.console.write_line(&block);

        let (path, mut file) = self.create_dump_file(report)?;
        file.write_all(block.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .map_err(|e| LogError::io(&path, e))?;

        error!(path = %path.display(), value = %report.value, "captured panic");
        Ok(path)
    }

    /// Create the dump file exclusively, taking the next suffix on a collision.
    fn create_dump_file(&self, report: &CrashReport) -> Result<(PathBuf, File)> {
        let mut attempts = 0;
        loop {
            let path = naming::next_path(
                &self.dir,
                CRASH_FILE_PREFIX,
                &report.timestamp,
                self.probe.as_ref(),
            );
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| LogError::io(parent, e))?;
            }

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempts < MAX_NAME_ATTEMPTS => {
                    attempts += 1;
                }
                Err(e) => return Err(LogError::io(&path, e)),
            }
        }
    }

    fn dump(&self, report: &CrashReport) {
        if let Err(e) = self.record(report) {
            fallback::report(self.console.as_ref(), "crash dump failed", &e);
        }
    }

    /// Run `f`; if it panics, dump the panic and return `None`.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        match panic_scope::catch(f) {
            Ok(value) => Some(value),
            Err(captured) => {
                self.dump(&captured.into_report(self.clock.now()));
                None
            }
        }
    }

    /// Await `future`; if it panics, dump the panic and return `None`.
    pub async fn capture_async<F: Future>(&self, future: F) -> Option<F::Output> {
        match panic_scope::catch_async(future).await {
            Ok(value) => Some(value),
            Err(captured) => {
                self.dump(&captured.into_report(self.clock.now()));
                None
            }
        }
    }
}

impl std::fmt::Debug for CrashRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrashRecorder")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ManualClock, OsFileProbe};
    use crate::infrastructure::logging::console::MemoryConsole;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn recorder(dir: &Path, console: Arc<MemoryConsole>) -> CrashRecorder {
        let clock = ManualClock::new(Local.with_ymd_and_hms(2026, 10, 19, 14, 3, 9).unwrap());
        CrashRecorder::new(dir, Arc::new(clock), Arc::new(OsFileProbe), console)
    }

    #[test]
    fn test_capture_writes_dump_and_swallows_panic() {
        let temp_dir = TempDir::new().unwrap();
        let console = Arc::new(MemoryConsole::new());
        let recorder = recorder(temp_dir.path(), Arc::clone(&console));

        let result: Option<()> = recorder.capture(|| panic!("boom"));
        assert!(result.is_none());

        let path = temp_dir
            .path()
            .join("2026-10-19")
            .join("exceptions.14_03_09.log");
        let dump = std::fs::read_to_string(&path).unwrap();
        assert!(dump.contains("EXCEPTION: \"boom\""));
        assert!(dump.contains("crash.rs"));

        let echoed = console.lines();
        assert_eq!(echoed.len(), 1);
        assert!(echoed[0].contains("boom"));
    }

    #[test]
    fn test_dump_contains_stack_text() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = recorder(temp_dir.path(), Arc::new(MemoryConsole::new()));
        let report = CrashReport {
            value: "boom".into(),
            location: None,
            backtrace: "   0: worker::step\n   1: worker::run".into(),
            timestamp: Local.with_ymd_and_hms(2026, 10, 19, 14, 3, 9).unwrap(),
        };

        let path = recorder.record(&report).unwrap();
        let dump = std::fs::read_to_string(path).unwrap();
        assert!(dump.contains("boom"));
        assert!(dump.contains("   0: worker::step\n   1: worker::run"));
    }

    #[test]
    fn test_second_dump_in_same_second_is_suffixed() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = recorder(temp_dir.path(), Arc::new(MemoryConsole::new()));

        let _: Option<()> = recorder.capture(|| panic!("first"));
        let _: Option<()> = recorder.capture(|| panic!("second"));

        let dir = temp_dir.path().join("2026-10-19");
        assert!(dir.join("exceptions.14_03_09.log").is_file());
        let second = std::fs::read_to_string(dir.join("exceptions.14_03_09_1.log")).unwrap();
        assert!(second.contains("second"));
    }

    #[test]
    fn test_capture_returns_value_without_dump() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = recorder(temp_dir.path(), Arc::new(MemoryConsole::new()));

        assert_eq!(recorder.capture(|| 40 + 2), Some(42));
        assert!(!temp_dir.path().join("2026-10-19").exists());
    }

    #[test]
    fn test_unwritable_dump_falls_back_to_console() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("exceptions");
        std::fs::write(&blocker, b"").unwrap();
        let console = Arc::new(MemoryConsole::new());
        let recorder = recorder(&blocker, Arc::clone(&console));

        let _: Option<()> = recorder.capture(|| panic!("lost"));

        let lines = console.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("lost"));
        assert!(lines[1].starts_with("rotolog: crash dump failed"));
    }

    #[tokio::test]
    async fn test_capture_async() {
        let temp_dir = TempDir::new().unwrap();
        let recorder = recorder(temp_dir.path(), Arc::new(MemoryConsole::new()));

        let result: Option<()> = recorder
            .capture_async(async {
                tokio::task::yield_now().await;
                panic!("async boom");
            })
            .await;
        assert!(result.is_none());

        let dump = std::fs::read_to_string(
            temp_dir
                .path()
                .join("2026-10-19")
                .join("exceptions.14_03_09.log"),
        )
        .unwrap();
        assert!(dump.contains("async boom"));
    }
}
