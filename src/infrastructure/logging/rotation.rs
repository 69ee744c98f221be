//! Active log file and its rotation
//!
//! The handle owns exactly one open file at a time. Writers share a read
//! lock and append whole lines; rotation, retargeting and closing take the
//! write lock and swap the file identity in one step.

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use super::naming;
use crate::domain::error::{LogError, Result};
use crate::domain::ports::{Clock, FileProbe, OsFileProbe, SystemClock};

/// Size at which the active file is rotated (512 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;

#[derive(Debug)]
struct ActiveFile {
    dir: PathBuf,
    base_name: String,
    timestamp: DateTime<Local>,
    path: PathBuf,
    file: Option<File>,
}

/// Paths involved in a completed rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotated {
    pub previous: PathBuf,
    pub current: PathBuf,
}

/// The process's current log file plus its identity.
pub struct ActiveLogHandle {
    state: RwLock<ActiveFile>,
    clock: Arc<dyn Clock>,
    probe: Arc<dyn FileProbe>,
    max_file_size: u64,
}

impl ActiveLogHandle {
    /// Open the first file under `dir` using the system clock and filesystem.
    pub fn open(dir: impl AsRef<Path>, base_name: &str) -> Result<Self> {
        Self::open_with(
            dir,
            base_name,
            Arc::new(SystemClock),
            Arc::new(OsFileProbe),
            DEFAULT_MAX_FILE_SIZE,
        )
    }

    /// Open the first file with explicit time, filesystem and size policy.
    ///
    /// This is the only fallible step callers see: without a writable first
    /// file there is nowhere to log to.
    pub fn open_with(
        dir: impl AsRef<Path>,
        base_name: &str,
        clock: Arc<dyn Clock>,
        probe: Arc<dyn FileProbe>,
        max_file_size: u64,
    ) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let timestamp = clock.now();
        let (path, file) = open_new(&dir, base_name, &timestamp, probe.as_ref())?;

        debug!(path = %path.display(), "opened log file");

        Ok(Self {
            state: RwLock::new(ActiveFile {
                dir,
                base_name: base_name.to_string(),
                timestamp,
                path,
                file: Some(file),
            }),
            clock,
            probe,
            max_file_size,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, ActiveFile> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, ActiveFile> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `line` and a newline as one write under the shared lock.
    pub fn write(&self, line: &str) -> Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let state = self.read();
        let Some(file) = state.file.as_ref() else {
            return Err(LogError::Closed);
        };
        let mut writer: &File = file;
        writer
            .write_all(&buf)
            .map_err(|e| LogError::io(&state.path, e))
    }

    /// Whether the day changed, the file grew past the limit, or it vanished.
    ///
    /// When none of those hold the base directory is recreated if missing.
    pub fn needs_rotation(&self) -> bool {
        let (timestamp, path, dir) = {
            let state = self.read();
            if state.file.is_none() {
                return false;
            }
            (state.timestamp, state.path.clone(), state.dir.clone())
        };

        if self.clock.now().date_naive() != timestamp.date_naive() {
            return true;
        }

        if self
            .probe
            .size(&path)
            .is_ok_and(|size| size >= self.max_file_size)
        {
            return true;
        }

        if !self.probe.exists(&path) {
            return true;
        }

        if let Err(e) = std::fs::create_dir_all(&dir) {
            debug!(dir = %dir.display(), error = %e, "could not ensure log directory");
        }
        false
    }

    /// Open a fresh file stamped with the current time and retire the old one.
    ///
    /// The new file is opened before the old one is released, so on failure
    /// the handle keeps writing where it was.
    pub fn rotate(&self) -> Result<Rotated> {
        let mut state = self.exclusive();
        let timestamp = self.clock.now();
        let (path, file) = open_new(&state.dir, &state.base_name, &timestamp, self.probe.as_ref())?;

        let previous = std::mem::replace(&mut state.path, path.clone());
        state.timestamp = timestamp;
        drop(state.file.replace(file));
        drop(state);

        info!(
            old_path = %previous.display(),
            new_path = %path.display(),
            "rotated log file"
        );

        Ok(Rotated {
            previous,
            current: path,
        })
    }

    /// Point the handle at a new directory and base name.
    pub fn retarget(&self, dir: impl AsRef<Path>, base_name: &str) -> Result<Rotated> {
        let dir = dir.as_ref().to_path_buf();
        let mut state = self.exclusive();
        let timestamp = self.clock.now();
        let (path, file) = open_new(&dir, base_name, &timestamp, self.probe.as_ref())?;

        let previous = std::mem::replace(&mut state.path, path.clone());
        state.dir = dir;
        state.base_name = base_name.to_string();
        state.timestamp = timestamp;
        drop(state.file.replace(file));
        drop(state);

        info!(
            old_path = %previous.display(),
            new_path = %path.display(),
            "retargeted log file"
        );

        Ok(Rotated {
            previous,
            current: path,
        })
    }

    /// Push written data to disk.
    pub fn flush(&self) -> Result<()> {
        let state = self.read();
        match state.file.as_ref() {
            Some(file) => file.sync_data().map_err(|e| LogError::io(&state.path, e)),
            None => Ok(()),
        }
    }

    /// Flush and close the file. Later writes fail with [`LogError::Closed`].
    pub fn close(&self) -> Result<()> {
        let mut state = self.exclusive();
        let Some(file) = state.file.take() else {
            return Ok(());
        };
        file.sync_data().map_err(|e| LogError::io(&state.path, e))
    }

    pub fn is_open(&self) -> bool {
        self.read().file.is_some()
    }

    /// Path of the file currently receiving writes.
    pub fn current_path(&self) -> PathBuf {
        self.read().path.clone()
    }

    pub fn base_name(&self) -> String {
        self.read().base_name.clone()
    }
}

impl std::fmt::Debug for ActiveLogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("ActiveLogHandle")
            .field("path", &state.path)
            .field("open", &state.file.is_some())
            .field("max_file_size", &self.max_file_size)
            .finish_non_exhaustive()
    }
}

fn open_new(
    dir: &Path,
    base_name: &str,
    at: &DateTime<Local>,
    probe: &dyn FileProbe,
) -> Result<(PathBuf, File)> {
    let path = naming::next_path(dir, base_name, at, probe);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| LogError::io(parent, e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| LogError::io(&path, e))?;
    Ok((path, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ManualClock;
    use chrono::{Duration, TimeZone};
    use std::io;
    use tempfile::TempDir;

    /// Reports a fixed size for every file, otherwise defers to the OS.
    struct FixedSizeProbe(u64);

    impl FileProbe for FixedSizeProbe {
        fn size(&self, _path: &Path) -> io::Result<u64> {
            Ok(self.0)
        }

        fn exists(&self, path: &Path) -> bool {
            path.exists()
        }
    }

    /// Reports an empty file that is always present.
    struct PresentProbe;

    impl FileProbe for PresentProbe {
        fn size(&self, _path: &Path) -> io::Result<u64> {
            Ok(0)
        }

        fn exists(&self, _path: &Path) -> bool {
            true
        }
    }

    fn clock_at(h: u32, m: u32, s: u32) -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Local.with_ymd_and_hms(2026, 10, 19, h, m, s).unwrap(),
        ))
    }

    fn handle(dir: &Path, clock: Arc<ManualClock>) -> ActiveLogHandle {
        ActiveLogHandle::open_with(
            dir,
            "server",
            clock,
            Arc::new(OsFileProbe),
            DEFAULT_MAX_FILE_SIZE,
        )
        .unwrap()
    }

    #[test]
    fn test_open_creates_dated_file() {
        let temp_dir = TempDir::new().unwrap();
        let handle = handle(temp_dir.path(), clock_at(10, 22, 33));

        let expected = temp_dir
            .path()
            .join("2026-10-19")
            .join("server.10_22_33.log");
        assert_eq!(handle.current_path(), expected);
        assert!(expected.is_file());
    }

    #[test]
    fn test_open_fails_when_directory_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocked");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = ActiveLogHandle::open(&blocker, "server");
        assert!(matches!(result, Err(LogError::Io { .. })));
    }

    #[test]
    fn test_write_appends_lines() {
        let temp_dir = TempDir::new().unwrap();
        let handle = handle(temp_dir.path(), clock_at(8, 0, 0));

        handle.write("first").unwrap();
        handle.write("second").unwrap();

        let contents = std::fs::read_to_string(handle.current_path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_no_rotation_when_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let handle = handle(temp_dir.path(), clock_at(8, 0, 0));
        assert!(!handle.needs_rotation());
    }

    #[test]
    fn test_rotation_on_day_change() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock_at(23, 59, 59);
        let handle = handle(temp_dir.path(), clock.clone());
        assert!(!handle.needs_rotation());

        clock.advance(Duration::seconds(2));
        assert!(handle.needs_rotation());

        let rotated = handle.rotate().unwrap();
        assert_eq!(
            rotated.current,
            temp_dir
                .path()
                .join("2026-10-20")
                .join("server.00_00_01.log")
        );
        assert!(!handle.needs_rotation());
    }

    #[test]
    fn test_rotation_at_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let at_limit = ActiveLogHandle::open_with(
            temp_dir.path(),
            "big",
            clock_at(8, 0, 0),
            Arc::new(FixedSizeProbe(DEFAULT_MAX_FILE_SIZE)),
            DEFAULT_MAX_FILE_SIZE,
        )
        .unwrap();
        assert!(at_limit.needs_rotation());

        let below_limit = ActiveLogHandle::open_with(
            temp_dir.path(),
            "small",
            clock_at(8, 0, 0),
            Arc::new(FixedSizeProbe(DEFAULT_MAX_FILE_SIZE - 1)),
            DEFAULT_MAX_FILE_SIZE,
        )
        .unwrap();
        assert!(!below_limit.needs_rotation());
    }

    #[test]
    fn test_rotation_when_file_deleted() {
        let temp_dir = TempDir::new().unwrap();
        let handle = handle(temp_dir.path(), clock_at(8, 0, 0));

        std::fs::remove_file(handle.current_path()).unwrap();
        assert!(handle.needs_rotation());

        handle.rotate().unwrap();
        assert!(handle.current_path().is_file());
        assert!(!handle.needs_rotation());
    }

    #[test]
    fn test_same_second_rotations_are_suffixed() {
        let temp_dir = TempDir::new().unwrap();
        let handle = handle(temp_dir.path(), clock_at(12, 0, 0));
        let dir = temp_dir.path().join("2026-10-19");

        assert_eq!(handle.current_path(), dir.join("server.12_00_00.log"));
        assert_eq!(
            handle.rotate().unwrap().current,
            dir.join("server.12_00_00_1.log")
        );
        assert_eq!(
            handle.rotate().unwrap().current,
            dir.join("server.12_00_00_2.log")
        );
    }

    #[test]
    fn test_rotated_file_receives_no_more_writes() {
        let temp_dir = TempDir::new().unwrap();
        let handle = handle(temp_dir.path(), clock_at(12, 0, 0));

        handle.write("before").unwrap();
        let rotated = handle.rotate().unwrap();
        handle.write("after").unwrap();

        assert_eq!(
            std::fs::read_to_string(&rotated.previous).unwrap(),
            "before\n"
        );
        assert_eq!(
            std::fs::read_to_string(&rotated.current).unwrap(),
            "after\n"
        );
    }

    #[test]
    fn test_failed_rotation_keeps_old_file() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock_at(12, 0, 0);
        let handle = handle(temp_dir.path(), clock.clone());
        let original = handle.current_path();

        // A regular file where tomorrow's directory should go blocks the open.
        std::fs::write(temp_dir.path().join("2026-10-20"), b"").unwrap();
        clock.advance(Duration::days(1));

        assert!(handle.rotate().is_err());
        assert_eq!(handle.current_path(), original);
        handle.write("still here").unwrap();
        assert!(std::fs::read_to_string(&original)
            .unwrap()
            .contains("still here"));
    }

    #[test]
    fn test_retarget_switches_base_name() {
        let temp_dir = TempDir::new().unwrap();
        let clock = clock_at(9, 0, 0);
        let handle = handle(temp_dir.path(), clock.clone());
        let first = handle.current_path();
        handle.write("old target").unwrap();

        clock.advance(Duration::seconds(5));
        let other_dir = temp_dir.path().join("other");
        let rotated = handle.retarget(&other_dir, "worker").unwrap();
        handle.write("new target").unwrap();

        assert_eq!(rotated.previous, first);
        assert_eq!(
            rotated.current,
            other_dir.join("2026-10-19").join("worker.09_00_05.log")
        );
        assert_eq!(handle.base_name(), "worker");
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "old target\n");
        assert_eq!(
            std::fs::read_to_string(&rotated.current).unwrap(),
            "new target\n"
        );
    }

    #[test]
    fn test_close_rejects_writes() {
        let temp_dir = TempDir::new().unwrap();
        let handle = handle(temp_dir.path(), clock_at(9, 0, 0));

        handle.write("last").unwrap();
        handle.close().unwrap();

        assert!(!handle.is_open());
        assert!(matches!(handle.write("dropped"), Err(LogError::Closed)));
        assert!(!handle.needs_rotation());
        handle.close().unwrap();
    }

    #[test]
    fn test_missing_base_directory_is_recreated() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("logs");
        let handle = ActiveLogHandle::open_with(
            &base,
            "svc",
            clock_at(9, 0, 0),
            Arc::new(FixedSizeProbe(0)),
            DEFAULT_MAX_FILE_SIZE,
        )
        .unwrap();

        // The file is still open, so only its parent tree disappears.
        std::fs::remove_dir_all(&base).unwrap();
        // FixedSizeProbe defers existence to the OS, so the vanished file triggers rotation.
        assert!(handle.needs_rotation());
        handle.rotate().unwrap();
        assert!(base.is_dir());
        assert!(!handle.needs_rotation());
    }

    #[test]
    fn test_base_directory_is_recreated_when_no_rotation_is_due() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("logs");
        let handle = ActiveLogHandle::open_with(
            &base,
            "svc",
            clock_at(9, 0, 0),
            Arc::new(PresentProbe),
            DEFAULT_MAX_FILE_SIZE,
        )
        .unwrap();
        let path = handle.current_path();

        std::fs::remove_dir_all(&base).unwrap();
        assert!(!base.exists());

        assert!(!handle.needs_rotation());
        assert!(base.is_dir());
        assert_eq!(handle.current_path(), path);
    }
}
