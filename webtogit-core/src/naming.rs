//! Deterministic file names for sources without an explicit `name`.
//!
//! `https://etherpad.example.org/p/meeting/export/txt` → `meeting.txt`

use crate::error::ManifestError;

/// Suffix appended to every derived name.
pub const DERIVED_SUFFIX: &str = ".txt";

const EXPORT_SUFFIX: &str = "/export/txt";

/// Derive the destination file name for `url`.
///
/// Pure: the same URL always yields the same name. Fails with
/// [`ManifestError::InvalidSourceUrl`] unless the URL uses an HTTP(S) scheme and
/// has a non-empty final path segment.
pub fn resolve_name(url: &str) -> Result<String, ManifestError> {
    let invalid = || ManifestError::InvalidSourceUrl {
        url: url.to_owned(),
    };

    let rest = check_url(url)?;

    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let rest = rest.strip_suffix(EXPORT_SUFFIX).unwrap_or(rest);

    // Pad names never contain slashes, so the last segment is the whole name.
    let base = rest.rsplit('/').next().unwrap_or(rest);
    if base.is_empty() || base == "." || base == ".." {
        return Err(invalid());
    }
    Ok(format!("{base}{DERIVED_SUFFIX}"))
}

/// Require an `http://` or `https://` URL with something after the scheme.
///
/// Returns the part after the scheme.
pub fn check_url(url: &str) -> Result<&str, ManifestError> {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| ManifestError::InvalidSourceUrl {
            url: url.to_owned(),
        })
}
