//! A frozen listing of a directory tree. See [`Snapshot::scan`].
//!
//! Every pruning stage works off the same snapshot, even though the tree on
//! disk changes underneath it as stages delete things. That's fine: deleting
//! something that's already gone is never an error.

use std::io::{Error, ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Relative paths under `root`, always separated with `/`.
///
/// Directories are listed after everything inside them, so walking `dirs`
/// front to back visits children before parents. The root itself is never
/// listed. Symlinks are recorded in `links` and never followed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub root: PathBuf,
    pub files: Vec<String>,
    pub dirs: Vec<String>,
    pub links: Vec<String>,

    /// Entries whose names aren't valid UTF-8. They're left alone, along
    /// with everything inside them.
    pub skipped: Vec<PathBuf>,
}

impl Snapshot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Read the real filesystem under `root`.
    ///
    /// Entries are visited in name order, so two scans of the same tree are
    /// identical.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !std::fs::metadata(root)?.is_dir() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }
        let mut snap = Self::new(root);
        _scan(root, root, &mut snap)?;
        Ok(snap)
    }

    /// Absolute location of a relative snapshot path. `"."` is the root.
    pub fn path_of(&self, rel: &str) -> PathBuf {
        match rel {
            "." | "" => self.root.clone(),
            _ => self.root.join(rel),
        }
    }
}

fn _scan(base: &Path, cur: &Path, snap: &mut Snapshot) -> Result<()> {
    let mut entries = std::fs::read_dir(cur)?.collect::<Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let rel = match to_slash(base, &path) {
            Ok(rel) => rel,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                snap.skipped.push(path);
                continue;
            }
            Err(e) => return Err(e),
        };
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            snap.links.push(rel);
        } else if file_type.is_dir() {
            _scan(base, &path, snap)?;
            snap.dirs.push(rel);
        } else {
            snap.files.push(rel);
        }
    }
    Ok(())
}

/// `path` relative to `base`, with `/` separators. Fails with `InvalidData`
/// if any part of it isn't valid UTF-8.
pub fn to_slash(base: &Path, path: &Path) -> Result<String> {
    let rel = path.strip_prefix(base).map_err(Error::other)?;
    let parts = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str().ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!("{} is not valid UTF-8", path.display()),
                )
            })),
            _ => None,
        })
        .collect::<Result<Vec<&str>>>()?;
    Ok(parts.join("/"))
}

/// Last segment of a slash-separated path.
pub fn base_name(rel: &str) -> &str {
    rel.rsplit('/').next().unwrap_or(rel)
}

/// Parent of a slash-separated path, `"."` for top-level entries.
pub fn parent_of(rel: &str) -> &str {
    match rel.rsplit_once('/') {
        Some((parent, _)) => parent,
        None => ".",
    }
}
