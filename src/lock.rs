//! Resolved dependencies, as handed over by the resolver.
//!
//! A lock file is JSON:
//!
//! ```
//! use vendorprune::lock::{Lock, UsedPackages};
//! use vendorprune::options::Policy;
//!
//! let lock = Lock::from_json(r#"{
//!     "prune": {
//!         "defaults": ["unused-packages", "go-test-files"],
//!         "projects": { "github.com/pkg/errors": ["non-go-files"] }
//!     },
//!     "projects": [
//!         { "name": "github.com/pkg/errors", "packages": ["."] },
//!         { "name": "golang.org/x/sys", "packages": ["unix", "windows"] }
//!     ]
//! }"#)?;
//!
//! assert_eq!(lock.projects[1].packages(), ["unix", "windows"]);
//! assert!(lock.prune.options_for("golang.org/x/sys").contains(Policy::UnusedPackages));
//! assert!(!lock.prune.options_for("github.com/pkg/errors").contains(Policy::UnusedPackages));
//! # Ok::<(), std::io::Error>(())
//! ```

use crate::options::PruneConfig;
use serde::{Deserialize, Serialize};
use std::io::Result;
use std::path::Path;

/// Package paths a project actually imports, relative to the project root.
///
/// `"."` is the project's root package. Membership is exact string equality.
pub trait UsedPackages {
    fn packages(&self) -> &[String];
}

impl UsedPackages for [String] {
    fn packages(&self) -> &[String] {
        self
    }
}

impl UsedPackages for Vec<String> {
    fn packages(&self) -> &[String] {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockedProject {
    /// Project root, e.g. `github.com/pkg/errors`. Also its path under the vendor dir.
    pub name: String,
    #[serde(default)]
    pub packages: Vec<String>,
}

impl UsedPackages for LockedProject {
    fn packages(&self) -> &[String] {
        &self.packages
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Lock {
    #[serde(default)]
    pub prune: PruneConfig,
    pub projects: Vec<LockedProject>,
}

impl Lock {
    pub fn from_json(txt: &str) -> Result<Self> {
        Ok(serde_json::from_str(txt)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
