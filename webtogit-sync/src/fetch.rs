//! Fetcher: downloads every manifest source into the repository's `pads/`.
//!
//! Each body is written to `<name>.webtogit.tmp` and renamed over the final
//! file, so a reader never observes a half-written artifact.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use webtogit_core::{manifest, paths, FetchPolicy, SourceRecord};

use crate::error::{io_err, SyncError};

// ---------------------------------------------------------------------------
// HTTP capability
// ---------------------------------------------------------------------------

/// Raw outcome of a single GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure: no status line was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

/// Single-attempt HTTP GET.
pub trait Fetch {
    fn get(&self, url: &str) -> Result<FetchResponse, TransportError>;
}

/// [`Fetch`] over a `ureq` agent with a per-request timeout.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("webtogit/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, TransportError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            // ureq reports 4xx/5xx as errors; they still carry a status for the caller.
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(t)) => return Err(TransportError(t.to_string())),
        };
        let status = response.status();
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| TransportError(format!("reading body: {e}")))?;
        Ok(FetchResponse { status, body })
    }
}

// ---------------------------------------------------------------------------
// Fetch report
// ---------------------------------------------------------------------------

/// One source that could not be archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    pub status: Option<u16>,
    pub reason: String,
}

impl From<FetchFailure> for SyncError {
    fn from(f: FetchFailure) -> Self {
        SyncError::Fetch {
            url: f.url,
            status: f.status,
            reason: f.reason,
        }
    }
}

/// Outcome of [`fetch_sources`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Files written, in manifest order.
    pub written: Vec<PathBuf>,
    /// Only populated under [`FetchPolicy::ContinueOnError`].
    pub failures: Vec<FetchFailure>,
}

// ---------------------------------------------------------------------------
// fetch_sources
// ---------------------------------------------------------------------------

/// Download every source listed for `repo_path`.
///
/// The manifest is `<repo>/sources.yml` unless `manifest_override` is given.
/// Under [`FetchPolicy::AbortOnFirstFailure`] the first failing source is
/// returned as [`SyncError::Fetch`] and later sources are not attempted.
pub fn fetch_sources(
    repo_path: &Path,
    manifest_override: Option<&Path>,
    client: &dyn Fetch,
    policy: FetchPolicy,
) -> Result<FetchReport, SyncError> {
    let manifest_path = manifest_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths::manifest_path(repo_path));
    let sources = manifest::load(&manifest_path)?;

    let content_dir = paths::content_dir(repo_path);
    std::fs::create_dir_all(&content_dir).map_err(|e| io_err(&content_dir, e))?;

    let mut report = FetchReport::default();
    for source in &sources {
        match fetch_one(source, client) {
            Ok(body) => {
                let target = content_dir.join(&source.name);
                write_atomic(&target, &body)?;
                tracing::info!(url = %source.url, path = %target.display(), "fetched");
                report.written.push(target);
            }
            Err(failure) => match policy {
                FetchPolicy::AbortOnFirstFailure => return Err(failure.into()),
                FetchPolicy::ContinueOnError => {
                    tracing::warn!(url = %failure.url, reason = %failure.reason, "fetch failed, continuing");
                    report.failures.push(failure);
                }
            },
        }
    }
    Ok(report)
}

fn fetch_one(source: &SourceRecord, client: &dyn Fetch) -> Result<Vec<u8>, FetchFailure> {
    match client.get(&source.url) {
        Ok(response) if response.is_success() => Ok(response.body),
        Ok(response) => Err(FetchFailure {
            url: source.url.clone(),
            status: Some(response.status),
            reason: "unexpected status code".into(),
        }),
        Err(TransportError(reason)) => Err(FetchFailure {
            url: source.url.clone(),
            status: None,
            reason,
        }),
    }
}

fn write_atomic(path: &Path, body: &[u8]) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}{}", path.display(), paths::TMP_SUFFIX));
    std::fs::write(&tmp, body).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
