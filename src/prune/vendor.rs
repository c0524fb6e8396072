//! Nested `vendor` directories.
//!
//! A vendored project can carry its own vendor tree. The build never looks
//! in there (the top-level vendor wins), so the whole thing can go.

use crate::fs::{remove_queued, Filesystem};
use crate::snapshot::{base_name, Snapshot};
use std::io::Result;
use std::path::PathBuf;

/// Finds the vendor trees to remove within a snapshot.
pub trait LocateVendorDirs {
    /// Absolute paths, each of which will be removed along with its contents.
    fn locate(&self, snap: &Snapshot) -> Vec<PathBuf>;
}

impl<F> LocateVendorDirs for F
where
    F: Fn(&Snapshot) -> Vec<PathBuf>,
{
    fn locate(&self, snap: &Snapshot) -> Vec<PathBuf> {
        self(snap)
    }
}

/// Directories and symlinks named exactly `vendor`, anywhere below the root.
///
/// Only the outermost of a vendor-within-vendor chain is returned, since
/// removing it takes the inner ones along. Directories come first, then
/// symlinks, each in snapshot order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedVendorDirs;

impl LocateVendorDirs for NestedVendorDirs {
    fn locate(&self, snap: &Snapshot) -> Vec<PathBuf> {
        let candidates: Vec<&str> = snap
            .dirs
            .iter()
            .chain(snap.links.iter())
            .map(String::as_str)
            .filter(|p| base_name(p) == "vendor")
            .collect();

        candidates
            .iter()
            .filter(|c| !candidates.iter().any(|outer| is_inside(c, outer)))
            .map(|c| snap.path_of(c))
            .collect()
    }
}

fn is_inside(path: &str, dir: &str) -> bool {
    path.len() > dir.len() && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}

/// Remove whatever `locator` finds. Already-missing paths are skipped.
pub fn prune_vendor_dirs(
    fs: &impl Filesystem,
    locator: &dyn LocateVendorDirs,
    snap: &Snapshot,
) -> Result<Vec<PathBuf>> {
    remove_queued(fs, locator.locate(snap), true)
}
