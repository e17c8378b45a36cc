use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "webtogit";

/// Presence (never content) authorizes discovery, sync and deletion.
pub const MARKER_FILE: &str = ".webtogit";
pub const LOCK_FILE: &str = ".webtogit.lock";
pub const CONTENT_DIR: &str = "pads";
pub const MANIFEST_FILE: &str = "sources.yml";
pub const README_FILE: &str = "README.md";
pub const GITIGNORE_FILE: &str = ".gitignore";
pub const SETTINGS_FILE: &str = "settings.yml";

/// Suffix of the sibling file a fetched body is written to before rename.
pub const TMP_SUFFIX: &str = ".webtogit.tmp";

pub fn marker_path(repo: &Path) -> PathBuf {
    repo.join(MARKER_FILE)
}

pub fn lock_path(repo: &Path) -> PathBuf {
    repo.join(LOCK_FILE)
}

pub fn content_dir(repo: &Path) -> PathBuf {
    repo.join(CONTENT_DIR)
}

pub fn manifest_path(repo: &Path) -> PathBuf {
    repo.join(MANIFEST_FILE)
}
