//! Per-repository sync reports.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use webtogit_core::RepoName;

use crate::error::SyncError;
use crate::fetch::FetchFailure;

/// What one successful repository sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Changed paths committed by this run, sorted. Empty: already up to date.
    pub changed: Vec<String>,
    /// Number of sources downloaded and written.
    pub fetched: usize,
    /// Sources skipped under the continue-on-error policy.
    pub failures: Vec<FetchFailure>,
    pub synced_at: DateTime<Utc>,
}

impl SyncSummary {
    pub fn is_up_to_date(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Outcome of syncing a single repository.
#[derive(Debug)]
pub struct RepoReport {
    pub name: RepoName,
    pub path: PathBuf,
    pub outcome: Result<SyncSummary, SyncError>,
}

impl RepoReport {
    /// `true` when the repository synced and no source failed.
    pub fn is_clean(&self) -> bool {
        matches!(&self.outcome, Ok(summary) if summary.failures.is_empty())
    }

    /// Plain-text report: changed-file count followed by one path per line,
    /// then any failures with the offending URL.
    pub fn render(&self) -> String {
        match &self.outcome {
            Ok(summary) => {
                let mut out = render_changes(&summary.changed);
                for failure in &summary.failures {
                    out.push('\n');
                    out.push_str(&render_failure(failure));
                }
                out
            }
            Err(err) => format!("sync failed: {err}"),
        }
    }
}

/// `"<n> files changed:"` followed by the paths, one per line.
pub fn render_changes(changed: &[String]) -> String {
    let mut lines = vec![format!("{} files changed:", changed.len())];
    lines.extend(changed.iter().map(|p| format!("  {p}")));
    lines.join("\n")
}

fn render_failure(failure: &FetchFailure) -> String {
    match failure.status {
        Some(code) => format!("failed: {} (status {code})", failure.url),
        None => format!("failed: {} ({})", failure.url, failure.reason),
    }
}
