//! On-disk naming for rotated logs and crash dumps.
//!
//! Both trees share one layout: `{root}/{YYYY-MM-DD}/{prefix}.{HH}_{MM}_{SS}[_N].log`.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::domain::ports::FileProbe;

/// Remove trailing path separators, keeping a bare root intact.
pub fn strip_trailing_separators(dir: &str) -> &str {
    let trimmed = dir.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        dir
    } else {
        trimmed
    }
}

/// `{root}/{YYYY-MM-DD}` for the given instant.
pub fn dated_dir(root: &Path, at: &DateTime<Local>) -> PathBuf {
    root.join(at.format("%Y-%m-%d").to_string())
}

/// `{prefix}.{HH}_{MM}_{SS}`, the file stem before disambiguation.
pub fn timed_stem(prefix: &str, at: &DateTime<Local>) -> String {
    format!("{prefix}.{}", at.format("%H_%M_%S"))
}

/// First unused `{stem}.log`, `{stem}_1.log`, `{stem}_2.log`, ... in `dir`.
pub fn unused_file_name(dir: &Path, stem: &str, probe: &dyn FileProbe) -> PathBuf {
    let plain = dir.join(format!("{stem}.log"));
    if !probe.exists(&plain) {
        return plain;
    }

    let mut n: u64 = 1;
    loop {
        let candidate = dir.join(format!("{stem}_{n}.log"));
        if !probe.exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Full path for a new file under `root` stamped with `at`.
pub fn next_path(root: &Path, prefix: &str, at: &DateTime<Local>, probe: &dyn FileProbe) -> PathBuf {
    let dir = dated_dir(root, at);
    unused_file_name(&dir, &timed_stem(prefix, at), probe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::OsFileProbe;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap()
    }

    #[test]
    fn test_strip_trailing_separators() {
        assert_eq!(strip_trailing_separators("./log/"), "./log");
        assert_eq!(strip_trailing_separators("C:\\logs\\"), "C:\\logs");
        assert_eq!(strip_trailing_separators("logs"), "logs");
        assert_eq!(strip_trailing_separators("/"), "/");
    }

    #[test]
    fn test_layout_is_zero_padded() {
        let root = Path::new("/var/log/app");
        assert_eq!(dated_dir(root, &at()), Path::new("/var/log/app/2026-03-07"));
        assert_eq!(timed_stem("server", &at()), "server.09_05_02");
    }

    #[test]
    fn test_collisions_get_monotonic_suffixes() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let first = unused_file_name(dir, "svc.09_05_02", &OsFileProbe);
        assert_eq!(first, dir.join("svc.09_05_02.log"));
        std::fs::write(&first, b"").unwrap();

        let second = unused_file_name(dir, "svc.09_05_02", &OsFileProbe);
        assert_eq!(second, dir.join("svc.09_05_02_1.log"));
        std::fs::write(&second, b"").unwrap();

        let third = unused_file_name(dir, "svc.09_05_02", &OsFileProbe);
        assert_eq!(third, dir.join("svc.09_05_02_2.log"));
    }

    #[test]
    fn test_next_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = next_path(temp_dir.path(), "exceptions", &at(), &OsFileProbe);
        assert_eq!(
            path,
            temp_dir.path().join("2026-03-07").join("exceptions.09_05_02.log")
        );
    }
}
