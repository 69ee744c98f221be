use std::io;
use std::path::Path;

/// Filesystem queries used to decide whether the active file must rotate.
pub trait FileProbe: Send + Sync {
    /// Size of the file in bytes.
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Probe backed by `std::fs` metadata calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileProbe;

impl FileProbe for OsFileProbe {
    fn size(&self, path: &Path) -> io::Result<u64> {
        std::fs::metadata(path).map(|meta| meta.len())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
