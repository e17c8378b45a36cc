//! Error types for webtogit-sync.

use std::path::PathBuf;

use thiserror::Error;

use webtogit_core::{ConfigError, ManifestError};

/// All errors that can arise from archive operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The source manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A single source could not be downloaded. `status` is `None` for
    /// transport failures and timeouts.
    #[error("failed to fetch {url}: {}", describe_fetch(.status, .reason))]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// A filesystem entry with the requested name exists but is not managed.
    #[error("{path} already exists and is not a managed repository; move it away and retry")]
    RepositoryAlreadyExists { path: PathBuf },

    /// Deletion refused: the sentinel marker is missing.
    #[error("refusing to delete {path}: marker file {marker} is missing")]
    UnsafeDeletion { path: PathBuf, marker: PathBuf },

    #[error("{path} is not a managed repository: {reason}")]
    NotARepository { path: PathBuf, reason: String },

    #[error("invalid repository name '{name}': must be a single directory name")]
    InvalidRepositoryName { name: String },

    /// Another process holds the repository lock.
    #[error("repository {path} is locked by another process (lock file {lock})")]
    Locked { path: PathBuf, lock: PathBuf },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_fetch(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("status {code} ({reason})"),
        None => reason.to_owned(),
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_url_and_status() {
        let err = SyncError::Fetch {
            url: "https://h/p/a".into(),
            status: Some(404),
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "failed to fetch https://h/p/a: status 404 (Not Found)");
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = SyncError::Fetch {
            url: "https://h/p/a".into(),
            status: None,
            reason: "timed out".into(),
        };
        assert_eq!(err.to_string(), "failed to fetch https://h/p/a: timed out");
    }
}
