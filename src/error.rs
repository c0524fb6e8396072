use crate::options::Policy;
use std::io;
use std::path::PathBuf;
use strum_macros::{Display, EnumIter};

/// A step of a pruning run, in the order they execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum Stage {
    #[strum(serialize = "prune nested vendor directories")]
    NestedVendorDirs,
    #[strum(serialize = "prune unused packages")]
    UnusedPackages,
    #[strum(serialize = "prune non-Go files")]
    NonGoFiles,
    #[strum(serialize = "prune Go test files")]
    GoTestFiles,
    #[strum(serialize = "delete empty directories")]
    EmptyDirSweep,
}

impl From<Policy> for Stage {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::NestedVendorDirs => Self::NestedVendorDirs,
            Policy::UnusedPackages => Self::UnusedPackages,
            Policy::NonGoFiles => Self::NonGoFiles,
            Policy::GoTestFiles => Self::GoTestFiles,
        }
    }
}

/// Why a pruning run stopped.
///
/// Already-absent paths never show up here. Anything that does show up may
/// have left the tree partially pruned.
#[derive(Debug, thiserror::Error)]
pub enum PruneError {
    /// Couldn't enumerate the tree. Nothing was touched.
    #[error("could not derive filesystem state of {}: {source}", root.display())]
    Snapshot {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The first unrecoverable error of a stage.
    #[error("failed to {stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: io::Error,
    },
}

impl PruneError {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Snapshot { .. } => None,
            Self::Stage { stage, .. } => Some(*stage),
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Snapshot { source, .. } | Self::Stage { source, .. } => source.kind(),
        }
    }
}

impl From<PruneError> for io::Error {
    fn from(e: PruneError) -> Self {
        Self::new(e.kind(), e)
    }
}
