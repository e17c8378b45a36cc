//! webtogit core library: domain types, manifest loading, naming, settings.
//!
//! Nothing in this crate touches git or the network:
//! - [`types`]: source records and manifest entries
//! - [`naming`]: deterministic file names from source URLs
//! - [`manifest`]: `sources.yml` loading and validation
//! - [`config`]: `settings.yml` loading and bootstrap
//! - [`paths`]: fixed file names inside a managed repository
//! - [`error`]: [`ManifestError`], [`ConfigError`]

pub mod config;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod paths;
pub mod types;

pub use config::{FetchPolicy, Settings};
pub use error::{ConfigError, ManifestError};
pub use types::{ManifestEntry, RepoName, SourceOptions, SourceRecord};
