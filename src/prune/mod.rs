//! Applying prune policies to a vendored project.
//!
//! ```
//! use vendorprune::logger::Logger;
//! use vendorprune::memfs::MemFs;
//! use vendorprune::options::PruneOptions;
//! use vendorprune::prune::Pruner;
//!
//! let fs = MemFs::with_tree("/v", ["pkg/a.go", "pkg/a_test.go", "pkg/README.md", "LICENSE"]);
//! let mut log = Logger::new_vec();
//! let used = vec!["pkg".to_string()];
//!
//! let report = Pruner::new(&fs, &mut log).prune_project("/v", &used, PruneOptions::all())?;
//! assert_eq!(report.total(), 2);
//! assert_eq!(fs.paths_under("/v"), vec!["LICENSE", "pkg/", "pkg/a.go"]);
//! # Ok::<(), vendorprune::error::PruneError>(())
//! ```

pub mod filetype;
pub mod sweep;
pub mod testfiles;
pub mod unused;
pub mod vendor;

use crate::error::{PruneError, Stage};
use crate::fs::Filesystem;
use crate::lock::{Lock, UsedPackages};
use crate::logger::Logger;
use crate::options::{Policy, PruneOptions};
use crate::preserve::PreservationRule;
use crate::snapshot::Snapshot;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use vendor::{LocateVendorDirs, NestedVendorDirs};

/// What a run actually removed. Paths that were already gone don't count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    removed: BTreeMap<Stage, Vec<PathBuf>>,

    /// Filled in by the unused packages stage, if it ran.
    pub unused_packages: BTreeSet<String>,
}

impl Report {
    pub fn removed(&self, stage: Stage) -> &[PathBuf] {
        self.removed.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.removed.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn record(&mut self, stage: Stage, removed: Vec<PathBuf>) {
        if !removed.is_empty() {
            self.removed.entry(stage).or_default().extend(removed);
        }
    }
}

pub struct Pruner<'a, F>
where
    F: Filesystem,
{
    fs: &'a F,
    log: &'a mut Logger,
    rule: PreservationRule,
    locator: Box<dyn LocateVendorDirs + 'a>,
}

impl<'a, F> Pruner<'a, F>
where
    F: Filesystem,
{
    pub fn new(fs: &'a F, log: &'a mut Logger) -> Self {
        Self {
            fs: fs,
            log: log,
            rule: PreservationRule::default(),
            locator: Box::new(NestedVendorDirs),
        }
    }

    pub fn with_rule(mut self, rule: PreservationRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_locator(mut self, locator: impl LocateVendorDirs + 'a) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Prune the project checked out at `root`, in place.
    ///
    /// Enabled policies run in stage order against a single snapshot, then
    /// empty directories are swept regardless of which policies were on. The
    /// first failure stops everything; whatever was removed up to that point
    /// stays removed.
    pub fn prune_project<U>(
        &mut self,
        root: impl AsRef<Path>,
        used: &U,
        options: PruneOptions,
    ) -> Result<Report, PruneError>
    where
        U: UsedPackages + ?Sized,
    {
        let root = root.as_ref();
        let snap = self
            .fs
            .snapshot(root)
            .map_err(|source| PruneError::Snapshot {
                root: root.into(),
                source: source,
            })?;
        for path in &snap.skipped {
            let _ = write!(
                self.log.warning(),
                "{}: name is not valid UTF-8, leaving it alone\n",
                path.display()
            );
        }

        let mut report = Report::default();
        for policy in options.iter() {
            self.run(policy.into(), &mut report, |p, report| {
                p.apply(policy, &snap, used.packages(), report)
            })?;
        }
        self.run(Stage::EmptyDirSweep, &mut report, |p, _| {
            sweep::delete_empty_dirs(p.fs, &snap)
        })?;
        Ok(report)
    }

    /// Prune every locked project under `vendor`, each with its own options.
    ///
    /// Project names must be relative paths that stay inside `vendor`.
    /// Projects missing from disk are skipped with a warning. Any other
    /// failure stops the whole tree.
    pub fn prune_vendor_tree(
        &mut self,
        vendor: impl AsRef<Path>,
        lock: &Lock,
    ) -> io::Result<Vec<(String, Report)>> {
        let vendor = vendor.as_ref();
        let mut reports = vec![];

        for project in &lock.projects {
            let dir = project_dir(vendor, &project.name)?;
            let options = lock.prune.options_for(&project.name);
            let _ = write!(self.log.stage(), "=== {} ===\n", project.name);

            match self.prune_project(dir, project, options) {
                Ok(report) => {
                    let _ = write!(
                        self.log.summary(),
                        "{}: removed {} entries\n",
                        project.name,
                        report.total()
                    );
                    reports.push((project.name.clone(), report));
                }
                Err(PruneError::Snapshot { root, source }) if source.kind() == ErrorKind::NotFound => {
                    let _ = write!(
                        self.log.warning(),
                        "{}: {} does not exist, skipping\n",
                        project.name,
                        root.display()
                    );
                }
                Err(e) => {
                    return Err(io::Error::new(
                        e.kind(),
                        format!("{}: {}", project.name, e),
                    ))
                }
            }
        }
        Ok(reports)
    }

    fn apply(
        &self,
        policy: Policy,
        snap: &Snapshot,
        used: &[String],
        report: &mut Report,
    ) -> io::Result<Vec<PathBuf>> {
        match policy {
            Policy::NestedVendorDirs => {
                vendor::prune_vendor_dirs(self.fs, self.locator.as_ref(), snap)
            }
            Policy::UnusedPackages => {
                let (unused, removed) =
                    unused::prune_unused_packages(self.fs, &self.rule, used, snap)?;
                report.unused_packages = unused;
                Ok(removed)
            }
            Policy::NonGoFiles => filetype::prune_non_go_files(self.fs, &self.rule, snap),
            Policy::GoTestFiles => testfiles::prune_go_test_files(self.fs, snap),
        }
    }

    // Logging is best effort. A closed stdout mustn't fail a stage or
    // lose track of what it already removed.
    fn run(
        &mut self,
        stage: Stage,
        report: &mut Report,
        work: impl FnOnce(&Self, &mut Report) -> io::Result<Vec<PathBuf>>,
    ) -> Result<(), PruneError> {
        let _ = write!(self.log.stage(), "--- {} ---\n", stage);
        let removed = work(self, report).map_err(|source| PruneError::Stage {
            stage: stage,
            source: source,
        })?;
        for path in &removed {
            let _ = write!(self.log.removal(), "{}\n", path.display());
        }
        report.record(stage, removed);
        Ok(())
    }
}

/// Where a locked project lives under `vendor`.
fn project_dir(vendor: &Path, name: &str) -> io::Result<PathBuf> {
    let rel = Path::new(name);
    let contained = rel.components().next().is_some()
        && rel.components().all(|c| matches!(c, Component::Normal(_)));
    match contained {
        true => Ok(vendor.join(rel)),
        false => Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!("{}: project name must be a relative path inside the vendor directory", name),
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fs::OsFs;
    use crate::lock::LockedProject;
    use crate::logger::Route;
    use crate::memfs::MemFs;
    use crate::test_tools::*;
    use indoc::indoc;

    const SCENARIO: [&str; 4] = ["pkg/a.go", "pkg/a_test.go", "pkg/README.md", "LICENSE"];

    #[test]
    fn end_to_end_on_disk() -> io::Result<()> {
        let dir = tree(&SCENARIO)?;
        let mut log = Logger::new_vec();
        let report = Pruner::new(&OsFs, &mut log).prune_project(
            dir.path(),
            &pkgs(&["pkg"]),
            PruneOptions::all(),
        )?;

        assert_eq!(survivors(dir.path())?, vec!["LICENSE", "pkg/", "pkg/a.go"]);
        assert_eq!(report.removed(Stage::NonGoFiles), [dir.path().join("pkg/README.md")]);
        assert_eq!(report.removed(Stage::GoTestFiles), [dir.path().join("pkg/a_test.go")]);
        assert_eq!(report.total(), 2);
        assert_eq!(
            report.unused_packages,
            BTreeSet::from([".".to_string()])
        );
        Ok(())
    }

    #[test]
    fn end_to_end_log() -> io::Result<()> {
        let fs = MemFs::with_tree("/v", SCENARIO);
        let mut log = Logger::new_vec();
        log.routes.removal = Route::Stdout;
        Pruner::new(&fs, &mut log).prune_project("/v", &pkgs(&["pkg"]), PruneOptions::all())?;

        assert_eq!(
            log.recorded(),
            (
                indoc! {"
                    --- prune nested vendor directories ---
                    --- prune unused packages ---
                    --- prune non-Go files ---
                    /v/pkg/README.md
                    --- prune Go test files ---
                    /v/pkg/a_test.go
                    --- delete empty directories ---
                "}
                .to_owned(),
                "".to_owned()
            )
        );
        Ok(())
    }

    #[test]
    fn idempotent() -> io::Result<()> {
        let dir = tree(&[
            "a.go",
            "README.md",
            "COPYING",
            "used/x.go",
            "used/x_test.go",
            "unused/deep/er/y.go",
            "unused/NOTICE",
            "sub/vendor/z/z.go",
            "docs/img/logo.png",
        ])?;
        let used = pkgs(&["used", "sub"]);

        let mut log = Logger::new_vec();
        let mut pruner = Pruner::new(&OsFs, &mut log);
        let first = pruner.prune_project(dir.path(), &used, PruneOptions::all())?;
        let after_first = survivors(dir.path())?;
        let second = pruner.prune_project(dir.path(), &used, PruneOptions::all())?;

        assert!(!first.is_empty());
        assert!(second.is_empty(), "Second run removed: {:?}", second);
        assert_eq!(survivors(dir.path())?, after_first);
        assert_eq!(after_first, vec!["COPYING", "unused/", "unused/NOTICE", "used/", "used/x.go"]);
        Ok(())
    }

    #[test]
    fn no_policies_still_sweeps() -> io::Result<()> {
        let fs = MemFs::with_tree("/v", ["README.md", "a_test.go", "empty/nested/", "vendor/x.go"]);
        let mut log = Logger::new_vec();
        let report =
            Pruner::new(&fs, &mut log).prune_project("/v", &pkgs(&[]), PruneOptions::none())?;

        assert_eq!(
            report.removed(Stage::EmptyDirSweep),
            [PathBuf::from("/v/empty/nested"), PathBuf::from("/v/empty")]
        );
        assert_eq!(report.total(), 2);
        assert_eq!(
            fs.paths_under("/v"),
            vec!["README.md", "a_test.go", "vendor/", "vendor/x.go"]
        );
        Ok(())
    }

    #[test]
    fn policies_are_independent() -> io::Result<()> {
        let files = ["a.go", "a_test.go", "notes.md", "x/vendor/v.go", "unused/u.go"];
        let cases = [
            (Policy::NestedVendorDirs, vec!["/v/x/vendor/v.go", "/v/x/vendor", "/v/x"]),
            (Policy::UnusedPackages, vec!["/v/unused/u.go", "/v/unused"]),
            (Policy::NonGoFiles, vec!["/v/notes.md"]),
            (Policy::GoTestFiles, vec!["/v/a_test.go"]),
        ];

        for (policy, gone) in cases {
            let fs = MemFs::with_tree("/v", files);
            let mut log = Logger::new_vec();
            Pruner::new(&fs, &mut log).prune_project(
                "/v",
                &pkgs(&[".", "x", "x/vendor"]),
                PruneOptions::none().with(policy),
            )?;
            for path in ["/v/a.go", "/v/a_test.go", "/v/notes.md", "/v/x/vendor/v.go", "/v/unused/u.go"] {
                assert_eq!(
                    fs.exists(path),
                    !gone.contains(&path),
                    "{:?} with only {:?} enabled",
                    path,
                    policy
                );
            }
        }
        Ok(())
    }

    #[test]
    fn preservation_asymmetry() -> io::Result<()> {
        let fs = MemFs::with_tree(
            "/v",
            ["LICENSE.md", "license_test.go", "other/AUTHORS", "other/PATENTS_test.go"],
        );
        let mut log = Logger::new_vec();
        let mut pruner = Pruner::new(&fs, &mut log);

        let opts = PruneOptions::from([Policy::UnusedPackages, Policy::NonGoFiles]);
        assert!(pruner.prune_project("/v", &pkgs(&[]), opts)?.is_empty());

        let report =
            pruner.prune_project("/v", &pkgs(&[]), PruneOptions::none().with(Policy::GoTestFiles))?;
        assert_eq!(
            report.removed(Stage::GoTestFiles),
            [
                PathBuf::from("/v/license_test.go"),
                PathBuf::from("/v/other/PATENTS_test.go")
            ]
        );
        assert_eq!(fs.paths_under("/v"), vec!["LICENSE.md", "other/", "other/AUTHORS"]);
        Ok(())
    }

    #[test]
    fn nested_vendor_takes_preserved_files() -> io::Result<()> {
        let fs = MemFs::with_tree("/v", ["a.go", "vendor/LICENSE", "vendor/x/x.go"]);
        let mut log = Logger::new_vec();
        Pruner::new(&fs, &mut log).prune_project(
            "/v",
            &pkgs(&["."]),
            PruneOptions::none().with(Policy::NestedVendorDirs),
        )?;
        assert_eq!(fs.paths_under("/v"), vec!["a.go"]);
        Ok(())
    }

    #[test]
    fn snapshot_failure_touches_nothing() {
        let fs = MemFs::with_tree("/v", ["a.md"]);
        let mut log = Logger::new_vec();
        let err = Pruner::new(&fs, &mut log)
            .prune_project("/elsewhere", &pkgs(&[]), PruneOptions::all())
            .unwrap_err();

        assert!(matches!(err, PruneError::Snapshot { .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(fs.removals().is_empty());
        assert_eq!(log.recorded(), ("".into(), "".into()));
    }

    #[test]
    fn fail_fast_without_rollback() {
        let fs = MemFs::with_tree("/v", ["x/vendor/v.go", "notes.md", "b.md", "a_test.go"]);
        fs.fail_on("/v/b.md");
        let mut log = Logger::new_vec();
        let err = Pruner::new(&fs, &mut log)
            .prune_project("/v", &pkgs(&["."]), PruneOptions::all())
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::NonGoFiles));
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(err.to_string().starts_with("failed to prune non-Go files: "));

        // Earlier stages stay done, later ones never ran
        assert!(!fs.exists("/v/x/vendor"));
        assert!(fs.exists("/v/x"));
        assert!(fs.exists("/v/notes.md"));
        assert!(fs.exists("/v/a_test.go"));
    }

    #[test]
    fn sweep_failure_is_tagged() {
        let fs = MemFs::with_tree("/v", ["stuck/"]);
        fs.fail_on("/v/stuck");
        let mut log = Logger::new_vec();
        let err = Pruner::new(&fs, &mut log)
            .prune_project("/v", &pkgs(&[]), PruneOptions::none())
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::EmptyDirSweep));
    }

    #[test]
    fn custom_rule_and_locator() -> io::Result<()> {
        let fs = MemFs::with_tree("/v", ["README.md", "LICENSE", "third_party/t.go", "a.go"]);
        let mut log = Logger::new_vec();
        Pruner::new(&fs, &mut log)
            .with_rule(PreservationRule::new(["readme"], [] as [&str; 0]))
            .with_locator(|s: &Snapshot| vec![s.path_of("third_party")])
            .prune_project(
                "/v",
                &pkgs(&["."]),
                PruneOptions::from([Policy::NestedVendorDirs, Policy::NonGoFiles]),
            )?;
        assert_eq!(fs.paths_under("/v"), vec!["README.md", "a.go"]);
        Ok(())
    }

    #[test]
    fn vendor_tree() -> io::Result<()> {
        let fs = MemFs::with_tree(
            "/vendor",
            [
                "github.com/a/one/one.go",
                "github.com/a/one/one_test.go",
                "github.com/a/one/unused/u.go",
                "github.com/b/two/two.go",
                "github.com/b/two/two_test.go",
            ],
        );
        let mut lock = Lock {
            projects: vec![
                LockedProject {
                    name: "github.com/a/one".into(),
                    packages: pkgs(&["."]),
                },
                LockedProject {
                    name: "github.com/missing/three".into(),
                    packages: pkgs(&["."]),
                },
                LockedProject {
                    name: "github.com/b/two".into(),
                    packages: pkgs(&["."]),
                },
            ],
            ..Default::default()
        };
        lock.prune.defaults = PruneOptions::from([Policy::GoTestFiles, Policy::UnusedPackages]);
        lock.prune
            .projects
            .insert("github.com/b/two".into(), PruneOptions::none());

        let mut log = Logger::new_vec();
        let reports = Pruner::new(&fs, &mut log).prune_vendor_tree("/vendor", &lock)?;

        assert_eq!(
            reports.iter().map(|(n, r)| (n.as_str(), r.total())).collect::<Vec<_>>(),
            vec![("github.com/a/one", 3), ("github.com/b/two", 0)]
        );
        assert_eq!(
            fs.paths_under("/vendor/github.com"),
            vec![
                "a/",
                "a/one/",
                "a/one/one.go",
                "b/",
                "b/two/",
                "b/two/two.go",
                "b/two/two_test.go",
            ]
        );

        let (out, err) = log.recorded();
        assert!(out.contains("github.com/a/one: removed 3 entries\n"));
        assert!(out.contains("github.com/b/two: removed 0 entries\n"));
        assert_eq!(
            err,
            "github.com/missing/three: /vendor/github.com/missing/three does not exist, skipping\n"
        );
        Ok(())
    }

    #[test]
    fn vendor_tree_failure_names_project() {
        let fs = MemFs::with_tree("/vendor", ["x/y/a_test.go"]);
        fs.fail_on("/vendor/x/y/a_test.go");
        let lock = Lock {
            prune: crate::options::PruneConfig {
                defaults: PruneOptions::all(),
                ..Default::default()
            },
            projects: vec![LockedProject {
                name: "x/y".into(),
                packages: pkgs(&["."]),
            }],
        };
        let mut log = Logger::new_vec();
        let err = Pruner::new(&fs, &mut log)
            .prune_vendor_tree("/vendor", &lock)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(err.to_string().starts_with("x/y: failed to prune Go test files: "));
    }

    #[test]
    fn vendor_tree_rejects_escaping_names() {
        for name in ["/home/user", "../home/user", "x/../../home/user", "./x", ""] {
            let fs = MemFs::with_tree("/", ["vendor/x/a.go", "home/user/notes.md"]);
            let lock = Lock {
                prune: crate::options::PruneConfig {
                    defaults: PruneOptions::none().with(Policy::NonGoFiles),
                    ..Default::default()
                },
                projects: vec![LockedProject {
                    name: name.into(),
                    packages: pkgs(&["."]),
                }],
            };
            let mut log = Logger::new_vec();
            let err = Pruner::new(&fs, &mut log)
                .prune_vendor_tree("/vendor", &lock)
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::InvalidInput, "name {:?}", name);
            assert!(err.to_string().starts_with(&format!("{}: ", name)));
            assert!(fs.exists("/home/user/notes.md"));
            assert!(fs.removals().is_empty());
        }
    }

    #[test]
    fn project_dirs() -> io::Result<()> {
        let vendor = Path::new("/vendor");
        assert_eq!(
            project_dir(vendor, "github.com/a/b")?,
            PathBuf::from("/vendor/github.com/a/b")
        );
        assert!(project_dir(vendor, "a/..").is_err());
        Ok(())
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn log_failures_do_not_stop_pruning() -> io::Result<()> {
        let fs = MemFs::with_tree("/v", ["a.go", "b.md", "notes.md", "x/x_test.go", "LICENSE"]);
        let mut log = Logger::new(ClosedPipe, ClosedPipe);
        log.routes.removal = Route::Stdout;

        let report =
            Pruner::new(&fs, &mut log).prune_project("/v", &pkgs(&[".", "x"]), PruneOptions::all())?;

        assert_eq!(
            report.removed(Stage::NonGoFiles),
            [PathBuf::from("/v/b.md"), PathBuf::from("/v/notes.md")]
        );
        assert_eq!(report.removed(Stage::GoTestFiles), [PathBuf::from("/v/x/x_test.go")]);
        assert_eq!(report.removed(Stage::EmptyDirSweep), [PathBuf::from("/v/x")]);
        assert_eq!(fs.paths_under("/v"), vec!["LICENSE", "a.go"]);
        Ok(())
    }

    #[test]
    fn log_failures_do_not_stop_vendor_tree() -> io::Result<()> {
        let fs = MemFs::with_tree("/vendor", ["p/a_test.go"]);
        let lock = Lock {
            prune: crate::options::PruneConfig {
                defaults: PruneOptions::all(),
                ..Default::default()
            },
            projects: vec![
                LockedProject {
                    name: "gone".into(),
                    packages: pkgs(&["."]),
                },
                LockedProject {
                    name: "p".into(),
                    packages: pkgs(&["."]),
                },
            ],
        };
        let mut log = Logger::new(ClosedPipe, ClosedPipe);
        let reports = Pruner::new(&fs, &mut log).prune_vendor_tree("/vendor", &lock)?;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "p");
        assert_eq!(reports[0].1.total(), 1);
        assert_eq!(fs.paths_under("/vendor"), vec!["p/"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_left_alone() -> io::Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tree(&["a.go", "notes.md"])?;
        let bad = dir.path().join(OsStr::from_bytes(b"bad\xff.md"));
        std::fs::write(&bad, "x")?;

        let mut log = Logger::new_vec();
        let report = Pruner::new(&OsFs, &mut log).prune_project(
            dir.path(),
            &pkgs(&["."]),
            PruneOptions::none().with(Policy::NonGoFiles),
        )?;

        assert_eq!(report.removed(Stage::NonGoFiles), [dir.path().join("notes.md")]);
        assert!(bad.exists());
        assert!(dir.path().join("a.go").exists());

        let (_, err) = log.recorded();
        assert_eq!(
            err,
            format!("{}: name is not valid UTF-8, leaving it alone\n", bad.display())
        );
        Ok(())
    }
}
