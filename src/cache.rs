use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error};
use tempfile::Builder;

use crate::{Error, Result};

/// Directory where decoded payloads are written before they are shared.
///
/// Files are never removed by the plugin; the OS reclaims its cache
/// directory on its own schedule.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` to `<cache>/<uuid>/<filename>` and returns the path.
    ///
    /// Every call gets its own directory so the shared file keeps the
    /// caller's filename without colliding with earlier shares.
    pub fn materialize(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = sanitize_file_name(filename)?;
        let slot = self.dir.join(uuid::Uuid::new_v4().to_string());
        fs::create_dir_all(&slot).map_err(|e| {
            error!("failed to create cache dir {}: {}", slot.display(), e);
            Error::FileCaching(format!("Failed to create cache dir: {}", e))
        })?;

        let mut temp_file = Builder::new()
            .prefix(".partial-")
            .tempfile_in(&slot)
            .map_err(|e| Error::FileCaching(format!("Failed to create temp file: {}", e)))?;
        temp_file
            .write_all(bytes)
            .and_then(|_| temp_file.flush())
            .map_err(|e| Error::FileCaching(format!("Failed to write to temp file: {}", e)))?;

        let target = slot.join(name);
        temp_file.persist(&target).map_err(|e| {
            error!("failed to persist {}: {}", target.display(), e.error);
            Error::FileCaching(format!("Failed to persist cached file: {}", e.error))
        })?;
        debug!("cached {} bytes at {}", bytes.len(), target.display());
        Ok(target)
    }
}

/// Reduces a caller-provided filename to its final component so it cannot
/// point outside the directory it is joined to.
pub fn sanitize_file_name(filename: &str) -> Result<&str> {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or(Error::NoFilename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materializes_under_the_given_name() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let path = cache.materialize("report.pdf", b"%PDF-1.7").unwrap();

        assert!(path.starts_with(dir.path()));
        assert_eq!(path.file_name().unwrap(), "report.pdf");
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn repeated_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let first = cache.materialize("a.txt", b"one").unwrap();
        let second = cache.materialize("a.txt", b"two").unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read(first).unwrap(), b"one");
        assert_eq!(fs::read(second).unwrap(), b"two");
    }

    #[test]
    fn strips_directory_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("..").unwrap_err().code(), "ERR_PARAM_NO_FILENAME");
    }

    #[test]
    fn unwritable_cache_is_a_caching_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();
        let cache = FileCache::new(&blocker);

        let err = cache.materialize("a.txt", b"x").unwrap_err();
        assert_eq!(err.code(), "ERR_FILE_CACHING_FAILED");
    }
}
