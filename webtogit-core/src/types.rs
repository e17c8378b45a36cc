//! Domain types for webtogit.
//!
//! All path fields use `PathBuf`; source URLs stay plain `String`s because they
//! are never parsed beyond the prefix checks in [`crate::naming`].

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The directory name of an archive repository under the data root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoName(pub String);

impl RepoName {
    /// `true` when the name is usable as a single directory below the data root:
    /// non-empty, no path separators, not `.` or `..`.
    pub fn is_valid(&self) -> bool {
        is_plain_file_name(&self.0)
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RepoName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RepoName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Manifest entries
// ---------------------------------------------------------------------------

/// Per-source options attached to an override entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One element of `sources.yml`, as written by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// `- https://host/p/pad`: name is derived from the URL.
    BareUrl(String),
    /// `- "https://host/p/pad": { name: renamed.md }`
    Override { url: String, options: SourceOptions },
}

impl ManifestEntry {
    pub fn url(&self) -> &str {
        match self {
            ManifestEntry::BareUrl(url) => url,
            ManifestEntry::Override { url, .. } => url,
        }
    }
}

/// A normalized source: where to fetch from and which file to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub url: String,
    /// File name inside the repository's content directory.
    pub name: String,
}

impl fmt::Display for SourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.url, self.name)
    }
}

pub(crate) fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
