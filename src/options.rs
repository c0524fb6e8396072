//! Which pruning policies to apply, globally and per project.
//!
//! ```
//! use vendorprune::options::{Policy, PruneOptions};
//!
//! let opts = PruneOptions::from([Policy::GoTestFiles, Policy::NestedVendorDirs]);
//! assert!(opts.contains(Policy::NestedVendorDirs));
//! assert!(!opts.contains(Policy::UnusedPackages));
//!
//! // Iteration always follows the stage order, not insertion order.
//! let order: Vec<Policy> = opts.iter().collect();
//! assert_eq!(order, vec![Policy::NestedVendorDirs, Policy::GoTestFiles]);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A single pruning policy.
///
/// Declaration order is the order the stages run in. Don't reorder these
/// without meaning to change behavior.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Remove `vendor` directories nested below the project root.
    NestedVendorDirs,
    /// Remove files in directories the project doesn't import.
    UnusedPackages,
    /// Remove everything that isn't Go, C, assembly etc. source.
    NonGoFiles,
    /// Remove `*_test.go` files.
    GoTestFiles,
}

impl Policy {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Command line flag, like `--unused-packages`.
    pub fn flag(&self) -> String {
        format!("--{}", self)
    }

    pub fn from_flag(arg: &str) -> Option<Self> {
        arg.strip_prefix("--").and_then(|name| name.parse().ok())
    }
}

/// An independent set of policies. Any subset is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Policy>", into = "Vec<Policy>")]
pub struct PruneOptions(u8);

impl PruneOptions {
    pub const fn none() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Policy::iter().collect()
    }

    pub fn with(mut self, policy: Policy) -> Self {
        self.insert(policy);
        self
    }

    pub fn insert(&mut self, policy: Policy) {
        self.0 |= policy.bit();
    }

    pub fn contains(&self, policy: Policy) -> bool {
        self.0 & policy.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Enabled policies, in stage order.
    pub fn iter(&self) -> impl Iterator<Item = Policy> + '_ {
        Policy::iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Policy> for PruneOptions {
    fn from_iter<I: IntoIterator<Item = Policy>>(iter: I) -> Self {
        let mut opts = Self::none();
        for policy in iter {
            opts.insert(policy);
        }
        opts
    }
}

impl<const N: usize> From<[Policy; N]> for PruneOptions {
    fn from(policies: [Policy; N]) -> Self {
        policies.into_iter().collect()
    }
}

impl From<Vec<Policy>> for PruneOptions {
    fn from(policies: Vec<Policy>) -> Self {
        policies.into_iter().collect()
    }
}

impl From<PruneOptions> for Vec<Policy> {
    fn from(opts: PruneOptions) -> Self {
        opts.iter().collect()
    }
}

/// Prune options for a whole vendor tree: defaults plus per-project overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PruneConfig {
    #[serde(default)]
    pub defaults: PruneOptions,

    /// Keyed by project root, e.g. `github.com/pkg/errors`.
    #[serde(default)]
    pub projects: BTreeMap<String, PruneOptions>,
}

impl PruneConfig {
    pub fn options_for(&self, project: &str) -> PruneOptions {
        self.projects
            .get(project)
            .copied()
            .unwrap_or(self.defaults)
    }
}
