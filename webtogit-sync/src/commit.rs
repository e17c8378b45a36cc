//! Commit engine: one commit per real change, never an empty one.

use webtogit_core::paths::CONTENT_DIR;

use crate::error::SyncError;
use crate::vcs::{ArchiveRepo, CommitSignature};

pub const COMMIT_MESSAGE: &str = "track changes to pads";

/// Stage `pads/`, diff against HEAD and commit if anything differs.
///
/// Returns the sorted changed paths (relative to the repository root). An
/// empty list means the archive was already up to date; no commit is made.
pub fn commit_changes(
    repo: &ArchiveRepo,
    signature: &CommitSignature,
) -> Result<Vec<String>, SyncError> {
    repo.stage_all(&[CONTENT_DIR])?;
    let changed = repo.diff_against_head()?;

    if changed.is_empty() {
        tracing::debug!(repo = %repo.path().display(), "nothing to commit");
        return Ok(changed);
    }

    let oid = repo.commit(COMMIT_MESSAGE, signature)?;
    tracing::info!(
        repo = %repo.path().display(),
        commit = %oid,
        files = changed.len(),
        "committed changes"
    );
    Ok(changed)
}
