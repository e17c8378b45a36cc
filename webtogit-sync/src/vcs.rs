//! Thin git wrapper.
//!
//! The engine needs exactly five operations from version control: `init`,
//! `open`, `stage_all`, `diff_against_head` and `commit`. [`ArchiveRepo`] wraps
//! a `git2::Repository` and exposes nothing else.

use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Repository, Signature};

use crate::error::SyncError;

/// Author/committer identity used for archive commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSignature {
    pub name: String,
    pub email: String,
}

impl CommitSignature {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn from_settings(settings: &webtogit_core::Settings) -> Self {
        Self::new(&settings.committer_name, &settings.committer_email)
    }

    fn to_git2(&self) -> Result<Signature<'static>, git2::Error> {
        Signature::now(&self.name, &self.email)
    }
}

/// An opened git working tree.
pub struct ArchiveRepo {
    repo: Repository,
    path: PathBuf,
}

impl std::fmt::Debug for ArchiveRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveRepo").field("path", &self.path).finish()
    }
}

impl ArchiveRepo {
    /// `git init` at `path`, creating the directory if needed.
    pub fn init(path: &Path) -> Result<Self, SyncError> {
        let repo = Repository::init(path)?;
        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing working tree rooted exactly at `path`.
    ///
    /// Parent directories are not searched, so a plain directory nested inside
    /// some other checkout is still [`SyncError::NotARepository`].
    pub fn open(path: &Path) -> Result<Self, SyncError> {
        let repo = Repository::open(path).map_err(|e| SyncError::NotARepository {
            path: path.to_path_buf(),
            reason: e.message().to_owned(),
        })?;
        if repo.is_bare() {
            return Err(SyncError::NotARepository {
                path: path.to_path_buf(),
                reason: "bare repository has no working tree".into(),
            });
        }
        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stage additions, modifications and deletions below each pathspec.
    pub fn stage_all(&self, pathspecs: &[&str]) -> Result<(), SyncError> {
        let mut index = self.repo.index()?;
        index.add_all(pathspecs.iter().copied(), IndexAddOption::DEFAULT, None)?;
        index.update_all(pathspecs.iter().copied(), None)?;
        index.write()?;
        Ok(())
    }

    /// Paths that differ between the index and the HEAD tree, sorted.
    ///
    /// Before the first commit every indexed path counts as changed.
    pub fn diff_against_head(&self) -> Result<Vec<String>, SyncError> {
        let index = self.repo.index()?;
        let head_tree = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(e) if is_unborn(&e) => None,
            Err(e) => return Err(e.into()),
        };
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)?;

        let mut paths: Vec<String> = diff
            .deltas()
            .filter_map(|delta| {
                delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        paths.sort();
        paths.dedup();
        Ok(paths)
    }

    /// Commit the current index on top of HEAD (or as the root commit).
    pub fn commit(&self, message: &str, signature: &CommitSignature) -> Result<git2::Oid, SyncError> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let sig = signature.to_git2()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if is_unborn(&e) => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        Ok(oid)
    }

    /// Number of commits reachable from HEAD; `0` for an unborn branch.
    pub fn commit_count(&self) -> Result<usize, SyncError> {
        match self.repo.head() {
            Ok(_) => {}
            Err(e) if is_unborn(&e) => return Ok(0),
            Err(e) => return Err(e.into()),
        }
        let mut walk = self.repo.revwalk()?;
        walk.push_head()?;
        Ok(walk.count())
    }
}

fn is_unborn(err: &git2::Error) -> bool {
    matches!(
        err.code(),
        git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound
    )
}
