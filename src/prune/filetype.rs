//! Files the Go toolchain would never look at.

use crate::fs::{remove_queued, Filesystem};
use crate::preserve::PreservationRule;
use crate::snapshot::{base_name, Snapshot};
use std::io::Result;
use std::path::PathBuf;

/// Extensions `go build` may consume: Go, cgo sources and headers, Fortran,
/// assembly, SWIG and system objects. Matched case-sensitively, which is why
/// `.s` and `.S` are both listed.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    ".go", ".c", ".cc", ".cpp", ".cxx", ".m", ".h", ".hh", ".hpp", ".hxx", ".f", ".F", ".for",
    ".f90", ".s", ".S", ".swig", ".swigcxx", ".syso",
];

/// Everything from the last `.` of the base name on, or `""` without one.
pub fn file_ext(path: &str) -> &str {
    let name = base_name(path);
    match name.rfind('.') {
        Some(i) => &name[i..],
        None => "",
    }
}

pub fn is_source_file(path: &str) -> bool {
    SOURCE_EXTENSIONS.contains(&file_ext(path))
}

pub fn collect_non_go_files(snap: &Snapshot, rule: &PreservationRule) -> Vec<PathBuf> {
    snap.files
        .iter()
        .filter(|path| !is_source_file(path))
        .filter(|path| !rule.is_preserved(base_name(path)))
        .map(|path| snap.path_of(path))
        .collect()
}

pub fn prune_non_go_files(
    fs: &impl Filesystem,
    rule: &PreservationRule,
    snap: &Snapshot,
) -> Result<Vec<PathBuf>> {
    remove_queued(fs, collect_non_go_files(snap, rule), false)
}
