//! Lifecycle manager: create archive repositories and delete them safely.
//!
//! Deletion is gated on the sentinel marker. `ignore_errors` only silences
//! the refusal; an unmarked directory is never removed.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use webtogit_core::{manifest, paths, RepoName, Settings};

use crate::error::{io_err, SyncError};
use crate::registry::{self, ManagedRepo, ScanEntry};
use crate::vcs::{ArchiveRepo, CommitSignature};

pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

const SAFETY_EXPLANATION: &str = "\
# The presence (not the content) of this file is checked before the repo is purged.
# This prevents the software from accidentally deleting an unrelated directory,
# e.g. due to a mistake in the configuration file.
";

fn gitignore_content() -> String {
    format!(
        "# root-level logs only; everything in {content}/ is archived\n/log.txt\n/*.log\n\n# sync lock and partially downloaded files\n/{lock}\n*{tmp}\n\n{SAFETY_EXPLANATION}/{marker}\n",
        content = paths::CONTENT_DIR,
        lock = paths::LOCK_FILE,
        tmp = paths::TMP_SUFFIX,
        marker = paths::MARKER_FILE,
    )
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(ManagedRepo),
    /// The directory was already a managed repository; nothing was touched.
    AlreadyManaged(ManagedRepo),
}

impl CreateOutcome {
    pub fn repo(&self) -> &ManagedRepo {
        match self {
            CreateOutcome::Created(r) | CreateOutcome::AlreadyManaged(r) => r,
        }
    }
}

/// Create `<datadir>/<name>` as a new archive repository.
///
/// Idempotent for an already managed repository. Any other existing entry of
/// that name fails with [`SyncError::RepositoryAlreadyExists`].
pub fn create_repo(settings: &Settings, name: &RepoName) -> Result<CreateOutcome, SyncError> {
    if !name.is_valid() {
        return Err(SyncError::InvalidRepositoryName {
            name: name.0.clone(),
        });
    }
    let path = settings.datadir_path.join(&name.0);

    if let ScanEntry::Managed(repo) = registry::inspect(&path) {
        tracing::info!(path = %path.display(), "already a managed repository, nothing to do");
        return Ok(CreateOutcome::AlreadyManaged(repo));
    }
    match path.symlink_metadata() {
        Ok(_) => return Err(SyncError::RepositoryAlreadyExists { path }),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(&path, e)),
    }

    std::fs::create_dir_all(&settings.datadir_path)
        .map_err(|e| io_err(&settings.datadir_path, e))?;

    if let Err(err) = populate(&path, settings) {
        // Only reached for a directory this call created.
        let _ = std::fs::remove_dir_all(&path);
        return Err(err);
    }
    tracing::info!(path = %path.display(), "created archive repository");

    Ok(CreateOutcome::Created(ManagedRepo {
        name: name.clone(),
        path,
    }))
}

fn populate(path: &Path, settings: &Settings) -> Result<(), SyncError> {
    let repo = ArchiveRepo::init(path)?;

    write_file(&paths::marker_path(path), SAFETY_EXPLANATION)?;
    write_file(&path.join(paths::README_FILE), &settings.readme_content)?;
    write_file(&path.join(paths::GITIGNORE_FILE), &gitignore_content())?;

    repo.stage_all(&[paths::README_FILE, paths::GITIGNORE_FILE])?;
    repo.commit(INITIAL_COMMIT_MESSAGE, &CommitSignature::from_settings(settings))?;

    // sources.yml stays untracked; users edit it freely.
    write_file(&paths::manifest_path(path), &manifest::default_manifest())?;
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<(), SyncError> {
    std::fs::write(path, contents).map_err(|e| io_err(path, e))
}

// ---------------------------------------------------------------------------
// Destroy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyOutcome {
    Removed(PathBuf),
    /// Marker missing and `ignore_errors` set: the directory was left alone.
    Skipped(PathBuf),
}

/// Recursively delete `repo_path` if and only if it carries the marker.
///
/// Without the marker this fails with [`SyncError::UnsafeDeletion`], or
/// returns [`DestroyOutcome::Skipped`] when `ignore_errors` is set. With the
/// marker, removal errors are returned unless `ignore_errors` is set, in which
/// case they are logged and swallowed.
pub fn destroy_repo(repo_path: &Path, ignore_errors: bool) -> Result<DestroyOutcome, SyncError> {
    let marker = paths::marker_path(repo_path);
    if !marker.is_file() {
        if ignore_errors {
            tracing::debug!(path = %repo_path.display(), "marker missing, leaving directory untouched");
            return Ok(DestroyOutcome::Skipped(repo_path.to_path_buf()));
        }
        return Err(SyncError::UnsafeDeletion {
            path: repo_path.to_path_buf(),
            marker,
        });
    }

    match std::fs::remove_dir_all(repo_path) {
        Ok(()) => {}
        Err(err) if ignore_errors => {
            tracing::warn!(path = %repo_path.display(), error = %err, "ignoring removal error");
        }
        Err(err) => return Err(io_err(repo_path, err)),
    }
    tracing::info!(path = %repo_path.display(), "removed archive repository");
    Ok(DestroyOutcome::Removed(repo_path.to_path_buf()))
}

/// [`destroy_repo`] for `<datadir>/<name>`.
pub fn destroy_named(
    settings: &Settings,
    name: &RepoName,
    ignore_errors: bool,
) -> Result<DestroyOutcome, SyncError> {
    if !name.is_valid() {
        return Err(SyncError::InvalidRepositoryName {
            name: name.0.clone(),
        });
    }
    destroy_repo(&settings.datadir_path.join(&name.0), ignore_errors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
