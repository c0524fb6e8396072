//! Packages the project doesn't import.
//!
//! Every directory in the tree is treated as a candidate package, so this
//! never has to parse any source. A directory whose path isn't on the used
//! list loses all of its (non-preserved) files. Each directory is judged on
//! its own: `foo/bar` being used says nothing about `foo` or `foo/bar/baz`.

use crate::fs::{remove_queued, Filesystem};
use crate::preserve::PreservationRule;
use crate::snapshot::{base_name, parent_of, Snapshot};
use std::collections::{BTreeSet, HashSet};
use std::io::Result;
use std::path::PathBuf;

/// Directories of `snap` that aren't in `used`. The root package `"."` is
/// unused unless listed.
pub fn calculate_unused_packages(used: &[String], snap: &Snapshot) -> BTreeSet<String> {
    let imported: HashSet<&str> = used.iter().map(String::as_str).collect();
    let mut unused = BTreeSet::new();

    if !imported.contains(".") {
        unused.insert(".".to_owned());
    }
    for dir in &snap.dirs {
        if !imported.contains(dir.as_str()) {
            unused.insert(dir.clone());
        }
    }
    unused
}

/// Files living directly in an unused package, minus preserved ones.
pub fn collect_unused_package_files(
    snap: &Snapshot,
    unused: &BTreeSet<String>,
    rule: &PreservationRule,
) -> Vec<PathBuf> {
    snap.files
        .iter()
        .filter(|path| !rule.is_preserved(base_name(path)))
        .filter(|path| unused.contains(parent_of(path)))
        .map(|path| snap.path_of(path))
        .collect()
}

/// Returns the unused package set alongside what was removed.
pub fn prune_unused_packages(
    fs: &impl Filesystem,
    rule: &PreservationRule,
    used: &[String],
    snap: &Snapshot,
) -> Result<(BTreeSet<String>, Vec<PathBuf>)> {
    let unused = calculate_unused_packages(used, snap);
    let queue = collect_unused_package_files(snap, &unused, rule);
    let removed = remove_queued(fs, queue, false)?;
    Ok((unused, removed))
}
