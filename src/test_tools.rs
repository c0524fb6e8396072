use crate::snapshot::Snapshot;
use std::io::Result;
use std::path::Path;
use tempfile::TempDir;

/// A temp directory holding the given entries. Entries ending in `/` are
/// directories; files get their own path as contents.
pub fn tree(entries: &[&str]) -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for entry in entries {
        match entry.strip_suffix('/') {
            Some(sub) => std::fs::create_dir_all(dir.path().join(sub))?,
            None => {
                let path = dir.path().join(entry);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, entry)?;
            }
        }
    }
    Ok(dir)
}

/// Everything left under `root`, sorted, directories with a trailing `/`.
pub fn survivors(root: impl AsRef<Path>) -> Result<Vec<String>> {
    let snap = Snapshot::scan(root)?;
    let mut out: Vec<String> = snap
        .files
        .into_iter()
        .chain(snap.links)
        .chain(snap.dirs.into_iter().map(|d| d + "/"))
        .collect();
    out.sort();
    Ok(out)
}

pub fn pkgs(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| p.to_string()).collect()
}
