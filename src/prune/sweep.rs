//! Clearing out directories that pruning left empty.
//!
//! Emptiness is checked against the live filesystem, not the snapshot: the
//! whole point is to catch directories that earlier stages just emptied.

use crate::fs::{tolerate_missing, Filesystem};
use crate::snapshot::Snapshot;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::io::Result;
use std::path::{Path, PathBuf};

/// Remove every snapshot directory that is now empty. Never the root.
///
/// Deeper directories are visited first, so a directory whose only entries
/// were empty directories goes in the same sweep.
pub fn delete_empty_dirs(fs: &impl Filesystem, snap: &Snapshot) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<&str> = snap
        .dirs
        .iter()
        .map(String::as_str)
        .filter(|d| !matches!(*d, "." | ""))
        .collect();
    dirs.sort_by_key(|d| Reverse(d.matches('/').count()));

    let mut removed = vec![];
    for dir in dirs {
        let path = snap.path_of(dir);
        if remove_if_empty(fs, &path)? {
            removed.push(path);
        }
    }
    Ok(removed)
}

/// Like [`delete_empty_dirs`], for callers that only know which files they
/// deleted. Checks the parent directory of each deleted path. Only
/// directories strictly below `root` are candidates.
pub fn delete_empty_dirs_from(
    fs: &impl Filesystem,
    root: &Path,
    deleted: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let parents: BTreeSet<&Path> = deleted
        .iter()
        .filter_map(|p| p.parent())
        .filter(|dir| *dir != root && dir.starts_with(root))
        .collect();
    let mut parents: Vec<&Path> = parents.into_iter().collect();
    parents.sort_by_key(|p| Reverse(p.components().count()));

    let mut removed = vec![];
    for dir in parents {
        if remove_if_empty(fs, dir)? {
            removed.push(dir.to_path_buf());
        }
    }
    Ok(removed)
}

fn remove_if_empty(fs: &impl Filesystem, path: &Path) -> Result<bool> {
    if fs.is_non_empty_dir(path)? {
        return Ok(false);
    }
    tolerate_missing(fs.remove(path))
}
