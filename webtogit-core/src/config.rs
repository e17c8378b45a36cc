//! `settings.yml`: application settings.
//!
//! # Storage layout
//!
//! ```text
//! <config_dir>/webtogit/settings.yml   (key-value YAML, created by bootstrap)
//! <data_dir>/webtogit/                 (default data root, one dir per archive repo)
//! ```
//!
//! # API pattern
//!
//! Every function takes the config file path explicitly; only
//! [`default_configfile_path`] and [`default_datadir_path`] consult the
//! platform directories. The loaded [`Settings`] value is passed into each
//! component; nothing is read from the environment here.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{config_io, ConfigError};
use crate::paths::{APP_NAME, SETTINGS_FILE};

/// Keys that must be present in every settings file.
pub const REQUIRED_KEYS: &[&str] = &["datadir_path"];

pub const DEFAULT_REPO_NAME: &str = "archived-webdocs";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// 1. Types
// ---------------------------------------------------------------------------

/// What the fetcher does when one source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchPolicy {
    /// Stop the batch at the first failing source.
    #[default]
    AbortOnFirstFailure,
    /// Fetch every source and report all failures together.
    ContinueOnError,
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Parent directory of all archive repositories.
    pub datadir_path: PathBuf,
    #[serde(default = "default_repo_name")]
    pub default_repo_name: String,
    #[serde(default = "default_readme_content")]
    pub readme_content: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub fetch_policy: FetchPolicy,
    #[serde(default = "default_committer_name")]
    pub committer_name: String,
    #[serde(default = "default_committer_email")]
    pub committer_email: String,
}

impl Settings {
    /// Settings with every optional key at its default.
    pub fn new(datadir_path: impl Into<PathBuf>) -> Self {
        Self {
            datadir_path: datadir_path.into(),
            default_repo_name: default_repo_name(),
            readme_content: default_readme_content(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            fetch_policy: FetchPolicy::default(),
            committer_name: default_committer_name(),
            committer_email: default_committer_email(),
        }
    }

    /// Replace the data root, e.g. from a `--datadir-path` flag.
    pub fn with_datadir(mut self, datadir_path: Option<PathBuf>) -> Self {
        if let Some(path) = datadir_path {
            self.datadir_path = path;
        }
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_repo_name() -> String {
    DEFAULT_REPO_NAME.to_owned()
}

fn default_readme_content() -> String {
    format!("This repo was generated by {APP_NAME}\n")
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_committer_name() -> String {
    APP_NAME.to_owned()
}

fn default_committer_email() -> String {
    format!("{APP_NAME}@localhost")
}

// ---------------------------------------------------------------------------
// 2. Default locations
// ---------------------------------------------------------------------------

/// `<config_dir>/webtogit/settings.yml`
pub fn default_configfile_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME).join(SETTINGS_FILE))
        .ok_or(ConfigError::NoDefaultLocation { kind: "config" })
}

/// `<data_dir>/webtogit`
pub fn default_datadir_path() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or(ConfigError::NoDefaultLocation { kind: "data" })
}

/// Commented settings file pointing at `datadir_path`.
pub fn default_configfile_content(datadir_path: &Path) -> String {
    format!(
        r#"---
# This is the configuration file for {APP_NAME}. It uses key-value pairs in YAML format.

# parent directory of all archive repositories
datadir_path: {datadir:?}

default_repo_name: "{DEFAULT_REPO_NAME}"

readme_content: "This repo was generated by {APP_NAME}\n"

# seconds before a single download is abandoned
fetch_timeout_secs: {DEFAULT_FETCH_TIMEOUT_SECS}

# abort-on-first-failure | continue-on-error
fetch_policy: abort-on-first-failure
"#,
        datadir = datadir_path.display().to_string(),
    )
}

// ---------------------------------------------------------------------------
// 3. Check / load
// ---------------------------------------------------------------------------

/// Parse `path` and verify it is a mapping that carries every [`REQUIRED_KEYS`] entry.
pub fn check_config_file(path: &Path) -> Result<Mapping, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(config_io(path, e)),
    };

    let doc: Value = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let map = match doc {
        Value::Mapping(map) => map,
        other => {
            return Err(ConfigError::NotAMapping {
                path: path.to_path_buf(),
                found: describe(&other).to_owned(),
            })
        }
    };

    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| !map.contains_key(**key))
        .map(|key| (*key).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingKeys {
            path: path.to_path_buf(),
            keys: missing,
        });
    }
    Ok(map)
}

/// Load and validate the settings file.
pub fn load(path: &Path) -> Result<Settings, ConfigError> {
    let map = check_config_file(path)?;
    serde_yaml::from_value(Value::Mapping(map)).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// 4. Bootstrap
// ---------------------------------------------------------------------------

/// Result of [`bootstrap_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigBootstrap {
    /// A fresh file was written and passed the check.
    Created(PathBuf),
    /// The file already existed and passed the check.
    Existing(PathBuf),
}

impl ConfigBootstrap {
    pub fn path(&self) -> &Path {
        match self {
            ConfigBootstrap::Created(p) | ConfigBootstrap::Existing(p) => p,
        }
    }
}

/// Write a default settings file at `path`.
///
/// Fails with `AlreadyExists` rather than overwriting. Uses the `.tmp` + rename
/// pattern so a crash never leaves a half-written file behind.
pub fn create_config_file(path: &Path, datadir_path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| config_io(dir, e))?;
    }
    let tmp = path.with_extension("yml.tmp");
    std::fs::write(&tmp, default_configfile_content(datadir_path)).map_err(|e| config_io(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(config_io(path, e));
    }
    Ok(())
}

/// Ensure a valid settings file exists at `path`.
///
/// A missing file is created pointing at `datadir_path`; an existing one is
/// only checked, never rewritten.
pub fn bootstrap_config(path: &Path, datadir_path: &Path) -> Result<ConfigBootstrap, ConfigError> {
    if path.is_file() {
        check_config_file(path)?;
        return Ok(ConfigBootstrap::Existing(path.to_path_buf()));
    }
    create_config_file(path, datadir_path)?;
    check_config_file(path)?;
    Ok(ConfigBootstrap::Created(path.to_path_buf()))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "an empty document",
        Value::Sequence(_) => "a sequence",
        Value::String(_) => "a string",
        _ => "a scalar",
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
