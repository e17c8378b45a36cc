//! Source manifest (`sources.yml`) loading.
//!
//! # Format
//!
//! ```yaml
//! - https://etherpad.example.org/p/minutes
//! - "https://etherpad.example.org/p/draft":
//!     name: renamed_draft.md
//! ```
//!
//! The top level is a sequence. Each element is either a URL string or a
//! single-key mapping from URL to an options record. Entries are parsed into
//! [`ManifestEntry`] at this boundary and resolved into [`SourceRecord`]s whose
//! names are unique within the manifest.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use serde_yaml::Value;

use crate::error::ManifestError;
use crate::naming::{check_url, resolve_name};
use crate::paths::APP_NAME;
use crate::types::{is_plain_file_name, ManifestEntry, SourceOptions, SourceRecord};

/// Load and resolve the manifest at `path`.
///
/// Returns `ManifestNotFound` if absent, `Parse` on invalid YAML,
/// `Malformed`/`MalformedEntry` on a wrong shape and `DuplicateSourceName`
/// when two entries would write the same file.
pub fn load(path: &Path) -> Result<Vec<SourceRecord>, ManifestError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ManifestError::ManifestNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(ManifestError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    parse_str(&contents, path)
}

/// Parse and resolve an in-memory manifest; `origin` is used in error messages.
pub fn parse_str(contents: &str, origin: &Path) -> Result<Vec<SourceRecord>, ManifestError> {
    let entries = parse_entries(contents, origin)?;
    resolve(&entries, origin)
}

/// Parse the document into tagged entries without resolving names.
pub fn parse_entries(contents: &str, origin: &Path) -> Result<Vec<ManifestEntry>, ManifestError> {
    let doc: Value = serde_yaml::from_str(contents).map_err(|e| ManifestError::Parse {
        path: origin.to_path_buf(),
        source: e,
    })?;

    let items = match doc {
        Value::Sequence(items) => items,
        other => {
            return Err(ManifestError::Malformed {
                path: origin.to_path_buf(),
                reason: format!("expected a sequence of sources, found {}", kind_of(&other)),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| parse_entry(item, index, origin))
        .collect()
}

fn parse_entry(item: Value, index: usize, origin: &Path) -> Result<ManifestEntry, ManifestError> {
    let malformed = |reason: String| ManifestError::MalformedEntry {
        path: origin.to_path_buf(),
        index,
        reason,
    };

    match item {
        Value::String(url) => Ok(ManifestEntry::BareUrl(url)),
        Value::Mapping(map) => {
            if map.len() != 1 {
                return Err(malformed(format!(
                    "expected exactly one `url: {{options}}` pair, found {} keys",
                    map.len()
                )));
            }
            let Some((key, value)) = map.into_iter().next() else {
                return Err(malformed("empty mapping".into()));
            };
            let url = match key {
                Value::String(url) => url,
                other => {
                    return Err(malformed(format!(
                        "url key must be a string, found {}",
                        kind_of(&other)
                    )))
                }
            };
            if !value.is_mapping() {
                return Err(malformed(format!(
                    "options for {url} must be a mapping, found {}",
                    kind_of(&value)
                )));
            }
            let options: SourceOptions = serde_yaml::from_value(value)
                .map_err(|e| malformed(format!("invalid options for {url}: {e}")))?;
            Ok(ManifestEntry::Override { url, options })
        }
        other => Err(malformed(format!(
            "expected a url string or a single-key mapping, found {}",
            kind_of(&other)
        ))),
    }
}

/// Turn entries into records: derive missing names, validate explicit ones and
/// reject duplicates.
pub fn resolve(entries: &[ManifestEntry], origin: &Path) -> Result<Vec<SourceRecord>, ManifestError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut records = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let url = entry.url().to_owned();
        check_url(&url)?;
        let name = match entry {
            ManifestEntry::Override {
                options: SourceOptions { name: Some(name) },
                ..
            } => {
                if !is_plain_file_name(name) {
                    return Err(ManifestError::MalformedEntry {
                        path: origin.to_path_buf(),
                        index,
                        reason: format!("name '{name}' must be a plain file name"),
                    });
                }
                name.clone()
            }
            _ => resolve_name(&url)?,
        };

        if let Some(first) = seen.get(&name) {
            return Err(ManifestError::DuplicateSourceName {
                path: origin.to_path_buf(),
                name,
                first: first.clone(),
                second: url,
            });
        }
        seen.insert(name.clone(), url.clone());
        records.push(SourceRecord { url, name });
    }
    Ok(records)
}

/// The commented example manifest written into freshly created repositories.
pub fn default_manifest() -> String {
    format!(
        r#"---
# This is a comment and will be ignored. Same for empty lines.

# The top YAML element is a list. Entries are strings or mappings.
# Plain strings are urls; the file name is derived from the last path segment:

- https://etherpad.wikimedia.org/p/{APP_NAME}_testpad1
- "https://etherpad.wikimedia.org/p/{APP_NAME}_testpad2":
    name: renamed_testpad.md
- https://etherpad.wikimedia.org/p/{APP_NAME}_testpad3/export/txt
"#
    )
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
