//! Error types for webtogit-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading a source manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file did not exist at the expected path.
    #[error("manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// Underlying I/O failure while reading an existing manifest.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error: includes line context from serde_yaml.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Valid YAML, but the document is not a sequence of entries.
    #[error("malformed manifest at {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    /// One entry is neither a URL string nor a single-key `url: {options}` mapping.
    #[error("malformed manifest entry #{index} in {path}: {reason}")]
    MalformedEntry {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    /// The URL does not use an HTTP(S) scheme or has no usable final segment.
    #[error("invalid source url: {url}")]
    InvalidSourceUrl { url: String },

    /// Two entries resolve to the same destination file name.
    #[error("duplicate source name '{name}' in {path}: {first} and {second}")]
    DuplicateSourceName {
        path: PathBuf,
        name: String,
        first: String,
        second: String,
    },
}

/// All errors that can arise from settings bootstrap and loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed, but is not a key-value mapping.
    #[error("expected a mapping in {path}, found {found}; check the YAML syntax")]
    NotAMapping { path: PathBuf, found: String },

    #[error("the following keys are missing in {path}: {}", keys.join(", "))]
    MissingKeys { path: PathBuf, keys: Vec<String> },

    #[error("config file already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// `dirs` could not determine a platform config or data directory.
    #[error("cannot determine the default {kind} directory; pass an explicit path")]
    NoDefaultLocation { kind: &'static str },
}

pub(crate) fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_message_lists_every_key() {
        let err = ConfigError::MissingKeys {
            path: PathBuf::from("/etc/settings.yml"),
            keys: vec!["datadir_path".into(), "readme_content".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("datadir_path, readme_content"), "got: {msg}");
        assert!(msg.contains("/etc/settings.yml"));
    }

    #[test]
    fn duplicate_name_message_names_both_urls() {
        let err = ManifestError::DuplicateSourceName {
            path: PathBuf::from("sources.yml"),
            name: "pad.txt".into(),
            first: "https://a/p/pad".into(),
            second: "https://b/p/pad".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://a/p/pad") && msg.contains("https://b/p/pad"));
    }
}
