//! The filesystem operations pruning needs, behind a trait.
//!
//! [`OsFs`] is the real thing. [`crate::memfs::MemFs`] is an in-memory
//! stand-in for tests that shouldn't touch the disk.

use crate::snapshot::Snapshot;
use std::io::{ErrorKind, Result};
use std::path::{Path, PathBuf};

pub trait Filesystem {
    /// Capture the tree under `root`. Fails if `root` can't be walked.
    fn snapshot(&self, root: &Path) -> Result<Snapshot>;

    /// Whether `path` is a directory with at least one entry.
    ///
    /// Missing paths and non-directories are not non-empty directories, so
    /// they report `false` rather than an error.
    fn is_non_empty_dir(&self, path: &Path) -> Result<bool>;

    /// Remove a file, symlink or empty directory.
    fn remove(&self, path: &Path) -> Result<()>;

    /// Remove a file or symlink, or a directory with everything in it.
    /// Symlinks are never followed.
    fn remove_all(&self, path: &Path) -> Result<()>;
}

/// The operating system's filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl Filesystem for OsFs {
    fn snapshot(&self, root: &Path) -> Result<Snapshot> {
        Snapshot::scan(root)
    }

    fn is_non_empty_dir(&self, path: &Path) -> Result<bool> {
        match std::fs::symlink_metadata(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
            Ok(meta) if !meta.is_dir() => Ok(false),
            Ok(_) => Ok(std::fs::read_dir(path)?.next().is_some()),
        }
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if std::fs::symlink_metadata(path)?.is_dir() {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        if std::fs::symlink_metadata(path)?.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        }
    }
}

/// Treat "already gone" as done. `Ok(true)` means this call removed it.
pub fn tolerate_missing(res: Result<()>) -> Result<bool> {
    match res {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Remove every queued path, in order, stopping at the first real failure.
///
/// With `recursive`, directories go along with their contents. Returns the
/// paths that this call actually removed.
pub fn remove_queued(
    fs: &impl Filesystem,
    queue: impl IntoIterator<Item = PathBuf>,
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    let mut removed = vec![];
    for path in queue {
        let res = match recursive {
            true => fs.remove_all(&path),
            false => fs.remove(&path),
        };
        if tolerate_missing(res)? {
            removed.push(path);
        }
    }
    Ok(removed)
}
