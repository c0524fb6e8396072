use crate::options::Policy;
use indoc::indoc;
use strum::IntoEnumIterator;

pub struct PolicyDoc {
    pub short: &'static str,
    pub long: &'static str,
}

impl Policy {
    pub fn doc(&self) -> PolicyDoc {
        match self {
            Policy::NestedVendorDirs => PolicyDoc {
                short: "Remove vendor directories nested below the root.",
                long: "Each one goes with everything inside it, license files included.",
            },
            Policy::UnusedPackages => PolicyDoc {
                short: "Remove files from packages that aren't used.",
                long: "A directory is used if it's given with --package (or listed in the lock file). License and legal files are kept.",
            },
            Policy::NonGoFiles => PolicyDoc {
                short: "Remove files that the Go toolchain won't read.",
                long: "Go, C/C++, Objective-C, Fortran, assembly, SWIG and .syso files stay. License and legal files are kept.",
            },
            Policy::GoTestFiles => PolicyDoc {
                short: "Remove *_test.go files.",
                long: "License-looking names are not exempt.",
            },
        }
    }
}

const HEADER: &str = indoc! {"
    Usage: vendorprune [option...] root

    Prunes the vendored project at root, in place. Directories that end up
    empty are removed afterwards, even if no policies are enabled.

    Policies, applied in this order:

"};

const OPTIONS: &str = indoc! {"
    Other options:

    --all: Enable every policy.
    --package path: Mark a package (relative to root) as used. Repeatable. Use . for the root package.
    --lock file: Treat root as a vendor directory and prune every project in a JSON lock file.
        Policy flags replace the lock file's default policies. Can't be combined with --package.
    --verbose: Print every removed path.
    --help: Print this message.
    --version: Print the version.
"};

pub fn usage() -> String {
    let mut sections: Vec<String> = vec![HEADER.into()];
    for policy in Policy::iter() {
        let doc = policy.doc();
        sections.push(format!(
            "{}: {}\n    {}\n\n",
            policy.flag(),
            doc.short,
            doc.long
        ));
    }
    sections.push(OPTIONS.into());
    sections.concat()
}
