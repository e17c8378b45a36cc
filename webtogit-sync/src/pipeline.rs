//! Shared sync pipeline entrypoint used by the CLI.
//!
//! For each managed repository: lock, fetch every source, commit what changed.
//! A failing repository is recorded in its [`RepoReport`] and the run moves on.

use std::path::{Path, PathBuf};

use chrono::Utc;

use webtogit_core::{paths, FetchPolicy, RepoName, Settings};

use crate::commit::commit_changes;
use crate::error::SyncError;
use crate::fetch::{fetch_sources, Fetch};
use crate::lock::RepoLock;
use crate::registry::{self, ManagedRepo};
use crate::report::{RepoReport, SyncSummary};
use crate::vcs::CommitSignature;

/// Scope for a sync pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncScope {
    /// Sync every managed repository under the data root.
    All,
    /// Sync a single repository by directory name.
    Repository(RepoName),
}

/// Per-run knobs layered over [`Settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub manifest_override: Option<PathBuf>,
    pub policy: FetchPolicy,
    pub signature: CommitSignature,
}

impl SyncOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            manifest_override: None,
            policy: settings.fetch_policy,
            signature: CommitSignature::from_settings(settings),
        }
    }
}

/// Run the sync pipeline for a scope.
///
/// Only discovery errors (unreadable data root, unknown repository name) fail
/// the whole call; everything else lands in the per-repository report.
pub fn run(
    settings: &Settings,
    scope: SyncScope,
    client: &dyn Fetch,
    options: &SyncOptions,
) -> Result<Vec<RepoReport>, SyncError> {
    let repos = match scope {
        SyncScope::All => registry::discover(&settings.datadir_path)?,
        SyncScope::Repository(name) => vec![registry::find(&settings.datadir_path, &name)?],
    };

    let reports = repos
        .into_iter()
        .map(|repo| {
            let outcome = sync_repo(&repo, client, options);
            if let Err(err) = &outcome {
                tracing::error!(repo = %repo.name, error = %err, "repository sync failed");
            }
            RepoReport {
                name: repo.name,
                path: repo.path,
                outcome,
            }
        })
        .collect();
    Ok(reports)
}

/// Fetch and commit a single managed repository under its lock.
pub fn sync_repo(
    repo: &ManagedRepo,
    client: &dyn Fetch,
    options: &SyncOptions,
) -> Result<SyncSummary, SyncError> {
    ensure_marker(&repo.path)?;
    let git = repo.open()?;
    let _lock = RepoLock::acquire(&repo.path)?;

    let fetched = fetch_sources(
        &repo.path,
        options.manifest_override.as_deref(),
        client,
        options.policy,
    )?;
    let changed = commit_changes(&git, &options.signature)?;

    Ok(SyncSummary {
        changed,
        fetched: fetched.written.len(),
        failures: fetched.failures,
        synced_at: Utc::now(),
    })
}

// The registry checked the marker at discovery time; re-check right before
// writing in case it was removed since.
fn ensure_marker(repo_path: &Path) -> Result<(), SyncError> {
    if paths::marker_path(repo_path).is_file() {
        Ok(())
    } else {
        Err(SyncError::NotARepository {
            path: repo_path.to_path_buf(),
            reason: format!("marker file {} is missing", paths::MARKER_FILE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchResponse, TransportError};
    use crate::lifecycle::create_repo;
    use tempfile::TempDir;

    struct Echo;

    impl Fetch for Echo {
        fn get(&self, url: &str) -> Result<FetchResponse, TransportError> {
            Ok(FetchResponse::ok(url.as_bytes()))
        }
    }

    #[test]
    fn run_all_empty_data_root_returns_empty_vec() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::new(tmp.path());
        let reports = run(&settings, SyncScope::All, &Echo, &SyncOptions::from_settings(&settings))
            .expect("run");
        assert!(reports.is_empty());
    }

    #[test]
    fn run_single_repository_returns_single_report() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::new(tmp.path());
        create_repo(&settings, &RepoName::from("one")).unwrap();
        create_repo(&settings, &RepoName::from("two")).unwrap();

        let reports = run(
            &settings,
            SyncScope::Repository(RepoName::from("two")),
            &Echo,
            &SyncOptions::from_settings(&settings),
        )
        .expect("run");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, RepoName::from("two"));
        let summary = reports[0].outcome.as_ref().expect("synced");
        assert_eq!(summary.changed.len(), 3);
    }

    #[test]
    fn unknown_repository_is_not_a_repository() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::new(tmp.path());
        let err = run(
            &settings,
            SyncScope::Repository(RepoName::from("ghost")),
            &Echo,
            &SyncOptions::from_settings(&settings),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::NotARepository { .. }));
    }

    #[test]
    fn held_lock_fails_only_that_repository() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::new(tmp.path());
        let a = create_repo(&settings, &RepoName::from("a")).unwrap();
        create_repo(&settings, &RepoName::from("b")).unwrap();

        let _held = RepoLock::acquire(&a.repo().path).unwrap();
        let reports = run(&settings, SyncScope::All, &Echo, &SyncOptions::from_settings(&settings))
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].outcome, Err(SyncError::Locked { .. })));
        assert!(reports[1].outcome.is_ok());
    }
}
