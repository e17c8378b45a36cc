//! # webtogit-sync
//!
//! Archive engine: discovery, fetch, commit and safe repository lifecycle.
//!
//! Call [`pipeline::run`] to sync every managed repository under the data
//! root, or [`pipeline::sync_repo`] for one. [`lifecycle`] creates and
//! destroys archive repositories.

pub mod commit;
pub mod error;
pub mod fetch;
pub mod lifecycle;
pub mod lock;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod vcs;

pub use error::SyncError;
pub use fetch::{Fetch, FetchFailure, FetchReport, FetchResponse, HttpFetcher, TransportError};
pub use lifecycle::{create_repo, destroy_named, destroy_repo, CreateOutcome, DestroyOutcome};
pub use pipeline::{SyncOptions, SyncScope};
pub use registry::{ManagedRepo, ScanEntry, SkipReason};
pub use report::{RepoReport, SyncSummary};
pub use vcs::{ArchiveRepo, CommitSignature};
