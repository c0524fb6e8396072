//! An in-memory [`Filesystem`], for exercising pruning without a disk.
//!
//! ```
//! use vendorprune::fs::Filesystem;
//! use vendorprune::memfs::MemFs;
//! use std::path::Path;
//!
//! let fs = MemFs::with_tree("/v", ["pkg/a.go", "pkg/README.md"]);
//! fs.remove(Path::new("/v/pkg/README.md"))?;
//! assert_eq!(fs.paths_under("/v"), vec!["pkg/", "pkg/a.go"]);
//! # Ok::<(), std::io::Error>(())
//! ```

use crate::fs::Filesystem;
use crate::snapshot::{to_slash, Snapshot};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    File,
    Dir,
    Link,
}

#[derive(Debug, Default)]
pub struct MemFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    failures: RefCell<BTreeSet<PathBuf>>,
    removals: RefCell<Vec<PathBuf>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// A root directory holding the given entries. Entries ending in `/` are
    /// directories, everything else is a file.
    pub fn with_tree<'a>(root: impl AsRef<Path>, entries: impl IntoIterator<Item = &'a str>) -> Self {
        let fs = Self::new();
        let root = root.as_ref();
        fs.add(root, Node::Dir);
        for entry in entries {
            match entry.strip_suffix('/') {
                Some(dir) => fs.add(root.join(dir), Node::Dir),
                None => fs.add(root.join(entry), Node::File),
            }
        }
        fs
    }

    /// Insert a node, creating missing parent directories.
    pub fn add(&self, path: impl AsRef<Path>, node: Node) {
        let path = path.as_ref();
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            nodes.entry(ancestor.into()).or_insert(Node::Dir);
        }
        nodes.insert(path.into(), node);
    }

    /// Make every operation on exactly this path fail with `PermissionDenied`.
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.failures.borrow_mut().insert(path.as_ref().into());
    }

    pub fn node(&self, path: impl AsRef<Path>) -> Option<Node> {
        self.nodes.borrow().get(path.as_ref()).copied()
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.node(path).is_some()
    }

    /// Successful removals so far, in order.
    pub fn removals(&self) -> Vec<PathBuf> {
        self.removals.borrow().clone()
    }

    /// Everything below `root`, relative and sorted, directories with a trailing `/`.
    pub fn paths_under(&self, root: impl AsRef<Path>) -> Vec<String> {
        let root = root.as_ref();
        let mut out: Vec<String> = self
            .nodes
            .borrow()
            .iter()
            .filter(|(p, _)| p.as_path() != root && p.starts_with(root))
            .filter_map(|(p, node)| {
                let rel = to_slash(root, p).ok()?;
                Some(match node {
                    Node::Dir => rel + "/",
                    _ => rel,
                })
            })
            .collect();
        out.sort();
        out
    }

    fn check(&self, path: &Path) -> Result<Node> {
        if self.failures.borrow().contains(path) {
            return Err(Error::new(
                ErrorKind::PermissionDenied,
                format!("{}: permission denied", path.display()),
            ));
        }
        self.node(path)
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("{}: not found", path.display())))
    }

    fn children(&self, dir: &Path) -> Vec<(PathBuf, Node)> {
        self.nodes
            .borrow()
            .iter()
            .filter(|(p, _)| p.parent() == Some(dir))
            .map(|(p, n)| (p.clone(), *n))
            .collect()
    }

    fn visit(&self, base: &Path, cur: &Path, snap: &mut Snapshot) -> Result<()> {
        for (path, node) in self.children(cur) {
            let rel = to_slash(base, &path)?;
            match node {
                Node::Link => snap.links.push(rel),
                Node::File => snap.files.push(rel),
                Node::Dir => {
                    self.visit(base, &path, snap)?;
                    snap.dirs.push(rel);
                }
            }
        }
        Ok(())
    }
}

impl Filesystem for MemFs {
    fn snapshot(&self, root: &Path) -> Result<Snapshot> {
        match self.check(root)? {
            Node::Dir => {
                let mut snap = Snapshot::new(root);
                self.visit(root, root, &mut snap)?;
                Ok(snap)
            }
            _ => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            )),
        }
    }

    fn is_non_empty_dir(&self, path: &Path) -> Result<bool> {
        match self.check(path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
            Ok(Node::Dir) => Ok(!self.children(path).is_empty()),
            Ok(_) => Ok(false),
        }
    }

    fn remove(&self, path: &Path) -> Result<()> {
        if self.check(path)? == Node::Dir && !self.children(path).is_empty() {
            return Err(Error::other(format!(
                "{}: directory not empty",
                path.display()
            )));
        }
        self.nodes.borrow_mut().remove(path);
        self.removals.borrow_mut().push(path.into());
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        self.check(path)?;
        self.nodes.borrow_mut().retain(|p, _| !p.starts_with(path));
        self.removals.borrow_mut().push(path.into());
        Ok(())
    }
}
