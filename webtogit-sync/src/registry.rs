//! Repository registry: discovery of managed repositories under the data root.
//!
//! # Storage layout
//!
//! ```text
//! <datadir>/
//!   <repo_name>/
//!     .webtogit      (sentinel marker, presence only)
//!     .git/
//!     sources.yml
//!     pads/
//! ```
//!
//! A child directory is managed iff it carries the marker *and* opens as a git
//! working tree. Everything else is reported as [`ScanEntry::Skipped`] with the
//! reason, never as an error. Nothing is cached: each call re-reads the disk.

use std::fmt;
use std::path::{Path, PathBuf};

use webtogit_core::{paths, RepoName};

use crate::error::{io_err, SyncError};
use crate::vcs::ArchiveRepo;

/// A repository that passed every discovery check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedRepo {
    pub name: RepoName,
    /// Absolute path when the data root is absolute.
    pub path: PathBuf,
}

impl ManagedRepo {
    pub fn open(&self) -> Result<ArchiveRepo, SyncError> {
        ArchiveRepo::open(&self.path)
    }
}

/// Why a data-root entry is not treated as a managed repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotADirectory,
    MissingMarker,
    NotARepository(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotADirectory => write!(f, "not a directory"),
            SkipReason::MissingMarker => write!(f, "marker file {} is missing", paths::MARKER_FILE),
            SkipReason::NotARepository(reason) => write!(f, "not a git working tree ({reason})"),
        }
    }
}

/// Classification of one direct child of the data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEntry {
    Managed(ManagedRepo),
    Skipped { path: PathBuf, reason: SkipReason },
}

impl ScanEntry {
    pub fn path(&self) -> &Path {
        match self {
            ScanEntry::Managed(repo) => &repo.path,
            ScanEntry::Skipped { path, .. } => path,
        }
    }
}

/// Classify a single directory.
pub fn inspect(path: &Path) -> ScanEntry {
    let skipped = |reason| ScanEntry::Skipped {
        path: path.to_path_buf(),
        reason,
    };

    if !path.is_dir() {
        return skipped(SkipReason::NotADirectory);
    }
    if !paths::marker_path(path).is_file() {
        return skipped(SkipReason::MissingMarker);
    }
    if let Err(err) = ArchiveRepo::open(path) {
        let reason = match err {
            SyncError::NotARepository { reason, .. } => reason,
            other => other.to_string(),
        };
        return skipped(SkipReason::NotARepository(reason));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ScanEntry::Managed(ManagedRepo {
        name: RepoName::from(name),
        path: path.to_path_buf(),
    })
}

/// Classify every direct child of `data_root`, sorted by file name.
///
/// A missing data root yields an empty list.
pub fn scan(data_root: &Path) -> Result<Vec<ScanEntry>, SyncError> {
    if !data_root.exists() {
        return Ok(vec![]);
    }
    let mut entries: Vec<_> = std::fs::read_dir(data_root)
        .map_err(|e| io_err(data_root, e))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let scanned = entries
        .into_iter()
        .map(|entry| {
            let result = inspect(&entry.path());
            if let ScanEntry::Skipped { path, reason } = &result {
                tracing::debug!(path = %path.display(), %reason, "skipping data-root entry");
            }
            result
        })
        .collect();
    Ok(scanned)
}

/// Managed repositories under `data_root`, sorted by name.
pub fn discover(data_root: &Path) -> Result<Vec<ManagedRepo>, SyncError> {
    Ok(scan(data_root)?
        .into_iter()
        .filter_map(|entry| match entry {
            ScanEntry::Managed(repo) => Some(repo),
            ScanEntry::Skipped { .. } => None,
        })
        .collect())
}

/// Look up one repository by directory name.
///
/// Returns [`SyncError::NotARepository`] when the directory is not managed.
pub fn find(data_root: &Path, name: &RepoName) -> Result<ManagedRepo, SyncError> {
    if !name.is_valid() {
        return Err(SyncError::InvalidRepositoryName {
            name: name.0.clone(),
        });
    }
    let path = data_root.join(&name.0);
    match inspect(&path) {
        ScanEntry::Managed(repo) => Ok(repo),
        ScanEntry::Skipped { path, reason } => Err(SyncError::NotARepository {
            path,
            reason: reason.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_git_dir(root: &Path, name: &str, marker: bool) -> PathBuf {
        let path = root.join(name);
        ArchiveRepo::init(&path).expect("init");
        if marker {
            fs::write(paths::marker_path(&path), "# marker\n").unwrap();
        }
        path
    }

    #[test]
    fn missing_data_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(discover(&tmp.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn only_marked_git_dirs_are_managed() {
        let tmp = TempDir::new().unwrap();
        make_git_dir(tmp.path(), "b_managed", true);
        make_git_dir(tmp.path(), "c_unmarked", false);
        let fake = tmp.path().join("a_marker_only");
        fs::create_dir_all(&fake).unwrap();
        fs::write(paths::marker_path(&fake), "").unwrap();
        fs::write(tmp.path().join("d_file.txt"), "x").unwrap();

        let repos = discover(tmp.path()).unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, RepoName::from("b_managed"));

        let scanned = scan(tmp.path()).unwrap();
        let reasons: Vec<_> = scanned
            .iter()
            .map(|e| match e {
                ScanEntry::Managed(_) => "managed".to_string(),
                ScanEntry::Skipped { reason, .. } => match reason {
                    SkipReason::NotADirectory => "file".into(),
                    SkipReason::MissingMarker => "unmarked".into(),
                    SkipReason::NotARepository(_) => "no-git".into(),
                },
            })
            .collect();
        assert_eq!(reasons, ["no-git", "managed", "unmarked", "file"]);
    }

    #[test]
    fn rescans_pick_up_external_changes() {
        let tmp = TempDir::new().unwrap();
        let path = make_git_dir(tmp.path(), "repo", true);
        assert_eq!(discover(tmp.path()).unwrap().len(), 1);

        fs::remove_file(paths::marker_path(&path)).unwrap();
        assert!(discover(tmp.path()).unwrap().is_empty());

        fs::write(paths::marker_path(&path), "").unwrap();
        assert_eq!(discover(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn find_rejects_unmanaged_and_invalid_names() {
        let tmp = TempDir::new().unwrap();
        make_git_dir(tmp.path(), "plain", false);
        let err = find(tmp.path(), &RepoName::from("plain")).unwrap_err();
        assert!(matches!(err, SyncError::NotARepository { .. }));

        let err = find(tmp.path(), &RepoName::from("../etc")).unwrap_err();
        assert!(matches!(err, SyncError::InvalidRepositoryName { .. }));
    }
}
