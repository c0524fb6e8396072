//! Which files look like they carry legal weight.
//!
//! These survive the content and usage based policies, in an attempt to
//! comply with license requirements of the vendored code. They do not
//! survive test file pruning or nested vendor pruning.

/// Name prefixes for license files.
pub const LICENSE_FILE_PREFIXES: &[&str] = &[
    "license",
    "licence",
    "copying",
    "unlicense",
    "copyright",
    "copyleft",
];

/// Substrings that are likely part of the name of a legal declaration file.
pub const LEGAL_FILE_SUBSTRINGS: &[&str] = &[
    "authors",
    "contributors",
    "legal",
    "notice",
    "disclaimer",
    "patent",
    "third-party",
    "thirdparty",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PreservationRule {
    prefixes: Vec<String>,
    substrings: Vec<String>,
}

impl PreservationRule {
    /// Both lists are matched case-insensitively.
    pub fn new<P, S>(
        prefixes: impl IntoIterator<Item = P>,
        substrings: impl IntoIterator<Item = S>,
    ) -> Self
    where
        P: AsRef<str>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
            substrings: substrings
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether a file's base name marks it as one to keep.
    ///
    /// The whole name counts, extension included: `LICENSE.md` starts with
    /// "license", `my-notice.txt` contains "notice".
    pub fn is_preserved(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
            || self.substrings.iter().any(|s| name.contains(s.as_str()))
    }
}

impl Default for PreservationRule {
    fn default() -> Self {
        Self::new(LICENSE_FILE_PREFIXES, LEGAL_FILE_SUBSTRINGS)
    }
}
