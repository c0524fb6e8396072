//! Prune vendored dependencies down to what the build needs.
//!
//! Once a dependency has been copied into a project's vendor tree, most of
//! it is dead weight: tests, docs, CI configs, packages nobody imports, the
//! dependency's own vendor directory. This crate removes that weight in
//! place, according to a set of independent [`options::Policy`] values,
//! while keeping anything that looks like a license or legal notice.
//!
//! Each run works from one [`snapshot::Snapshot`] of the tree taken up
//! front. Stages run in a fixed order and stop at the first real failure;
//! paths that are already gone are never a failure. Empty directories are
//! always swept up at the end.
//!
//! ```
//! use vendorprune::fs::OsFs;
//! use vendorprune::logger::Logger;
//! use vendorprune::options::{Policy, PruneOptions};
//! use vendorprune::prune::Pruner;
//!
//! let dir = tempfile::tempdir()?;
//! std::fs::write(dir.path().join("main.go"), "package main")?;
//! std::fs::write(dir.path().join(".travis.yml"), "language: go")?;
//! std::fs::write(dir.path().join("LICENSE"), "MIT")?;
//!
//! let mut log = Logger::new_vec();
//! let opts = PruneOptions::none().with(Policy::NonGoFiles);
//! Pruner::new(&OsFs, &mut log).prune_project(dir.path(), &Vec::<String>::new(), opts)?;
//!
//! assert!(dir.path().join("main.go").exists());
//! assert!(dir.path().join("LICENSE").exists());
//! assert!(!dir.path().join(".travis.yml").exists());
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod cli;
pub mod doc;
pub mod error;
pub mod fs;
pub mod lock;
pub mod logger;
pub mod memfs;
pub mod options;
pub mod preserve;
pub mod prune;
pub mod snapshot;

#[cfg(test)]
mod test_tools;

pub use error::{PruneError, Stage};
pub use lock::{Lock, LockedProject, UsedPackages};
pub use options::{Policy, PruneConfig, PruneOptions};
pub use preserve::PreservationRule;
pub use prune::{Pruner, Report};
