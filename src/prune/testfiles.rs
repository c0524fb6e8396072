//! Go test files.
//!
//! There is no preservation exemption here: `license_test.go` is a test file
//! first and goes like any other.

use crate::fs::{remove_queued, Filesystem};
use crate::snapshot::Snapshot;
use std::io::Result;
use std::path::PathBuf;

pub const TEST_FILE_SUFFIX: &str = "_test.go";

pub fn collect_go_test_files(snap: &Snapshot) -> Vec<PathBuf> {
    snap.files
        .iter()
        .filter(|path| path.ends_with(TEST_FILE_SUFFIX))
        .map(|path| snap.path_of(path))
        .collect()
}

pub fn prune_go_test_files(fs: &impl Filesystem, snap: &Snapshot) -> Result<Vec<PathBuf>> {
    remove_queued(fs, collect_go_test_files(snap), false)
}
