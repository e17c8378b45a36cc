//! End-to-end archive scenarios against real git repositories in a temp data
//! root. HTTP is replaced by an in-memory source table.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use webtogit_core::{paths, FetchPolicy, RepoName, Settings};
use webtogit_sync::{
    commit::commit_changes,
    create_repo, destroy_repo,
    pipeline::{self, SyncOptions, SyncScope},
    registry, ArchiveRepo, CommitSignature, DestroyOutcome, Fetch, FetchResponse, SyncError,
    TransportError,
};

const MANIFEST: &str = r#"
- https://pads.example.org/p/minutes
- "https://pads.example.org/p/draft":
    name: draft.md
- https://pads.example.org/p/notes/export/txt
"#;

/// Mutable stand-in for the pad server.
#[derive(Default)]
struct PadServer {
    pads: RefCell<HashMap<String, String>>,
}

impl PadServer {
    fn set(&self, url: &str, body: &str) {
        self.pads.borrow_mut().insert(url.to_string(), body.to_string());
    }

    fn remove(&self, url: &str) {
        self.pads.borrow_mut().remove(url);
    }
}

impl Fetch for PadServer {
    fn get(&self, url: &str) -> Result<FetchResponse, TransportError> {
        match self.pads.borrow().get(url) {
            Some(body) => Ok(FetchResponse::ok(body.as_bytes())),
            None => Ok(FetchResponse {
                status: 404,
                body: b"not found".to_vec(),
            }),
        }
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn seeded_server() -> PadServer {
    let server = PadServer::default();
    server.set("https://pads.example.org/p/minutes", "minutes v1");
    server.set("https://pads.example.org/p/draft", "# draft v1");
    server.set("https://pads.example.org/p/notes/export/txt", "notes v1");
    server
}

fn archive(settings: &Settings, name: &str) -> std::path::PathBuf {
    let repo = create_repo(settings, &RepoName::from(name)).expect("create");
    let path = repo.repo().path.clone();
    fs::write(paths::manifest_path(&path), MANIFEST).expect("write manifest");
    path
}

fn sync_all(settings: &Settings, server: &PadServer) -> Vec<webtogit_sync::RepoReport> {
    pipeline::run(
        settings,
        SyncScope::All,
        server,
        &SyncOptions::from_settings(settings),
    )
    .expect("run")
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn three_sources_then_one_change() {
    init_logging();
    let data = TempDir::new().unwrap();
    let settings = Settings::new(data.path());
    let path = archive(&settings, "pads");
    let server = seeded_server();

    let first = sync_all(&settings, &server);
    assert_eq!(first.len(), 1);
    let summary = first[0].outcome.as_ref().expect("first sync");
    assert_eq!(
        summary.changed,
        ["pads/draft.md", "pads/minutes.txt", "pads/notes.txt"]
    );
    assert_eq!(summary.fetched, 3);

    server.set("https://pads.example.org/p/draft", "# draft v2");
    let second = sync_all(&settings, &server);
    let summary = second[0].outcome.as_ref().expect("second sync");
    assert_eq!(summary.changed, ["pads/draft.md"]);

    let third = sync_all(&settings, &server);
    assert!(third[0].outcome.as_ref().unwrap().is_up_to_date());

    let git = ArchiveRepo::open(&path).unwrap();
    assert_eq!(git.commit_count().unwrap(), 3, "initial + two syncs");
}

#[test]
fn local_edit_is_committed_once() {
    let data = TempDir::new().unwrap();
    let settings = Settings::new(data.path());
    let path = archive(&settings, "pads");
    sync_all(&settings, &seeded_server());

    let git = ArchiveRepo::open(&path).unwrap();
    let sig = CommitSignature::new("Test", "test@test.com");
    fs::write(paths::content_dir(&path).join("minutes.txt"), "edited").unwrap();
    assert_eq!(commit_changes(&git, &sig).unwrap(), ["pads/minutes.txt"]);
    assert!(commit_changes(&git, &sig).unwrap().is_empty());
}

#[test]
fn broken_repository_does_not_block_the_others() {
    let data = TempDir::new().unwrap();
    let settings = Settings::new(data.path());
    let good = archive(&settings, "b_good");
    let bad = archive(&settings, "a_bad");
    fs::write(paths::manifest_path(&bad), "- ftp://pads.example.org/p/x\n").unwrap();

    let reports = sync_all(&settings, &seeded_server());
    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0].outcome, Err(SyncError::Manifest(_))));
    assert_eq!(reports[1].outcome.as_ref().unwrap().changed.len(), 3);
    assert!(paths::content_dir(&good).join("notes.txt").is_file());
}

#[test]
fn abort_policy_commits_nothing_from_failed_batch() {
    let data = TempDir::new().unwrap();
    let settings = Settings::new(data.path());
    let path = archive(&settings, "pads");
    let server = seeded_server();
    server.remove("https://pads.example.org/p/draft");

    let reports = sync_all(&settings, &server);
    match &reports[0].outcome {
        Err(SyncError::Fetch { url, status, .. }) => {
            assert_eq!(url, "https://pads.example.org/p/draft");
            assert_eq!(*status, Some(404));
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(ArchiveRepo::open(&path).unwrap().commit_count().unwrap(), 1);
}

#[test]
fn continue_policy_archives_what_it_can() {
    let data = TempDir::new().unwrap();
    let mut settings = Settings::new(data.path());
    settings.fetch_policy = FetchPolicy::ContinueOnError;
    archive(&settings, "pads");
    let server = seeded_server();
    server.remove("https://pads.example.org/p/draft");

    let reports = sync_all(&settings, &server);
    let summary = reports[0].outcome.as_ref().expect("partial sync");
    assert_eq!(summary.changed, ["pads/minutes.txt", "pads/notes.txt"]);
    assert_eq!(summary.failures.len(), 1);
    assert!(!reports[0].is_clean());
}

#[test]
fn registry_ignores_half_managed_directories() {
    let data = TempDir::new().unwrap();
    let settings = Settings::new(data.path());
    archive(&settings, "real");

    let marker_only = data.path().join("marker_only");
    fs::create_dir_all(&marker_only).unwrap();
    fs::write(paths::marker_path(&marker_only), "").unwrap();

    let git_only = data.path().join("git_only");
    ArchiveRepo::init(&git_only).unwrap();

    let names: Vec<_> = registry::discover(data.path())
        .unwrap()
        .into_iter()
        .map(|r| r.name.0)
        .collect();
    assert_eq!(names, ["real"]);

    // unmanaged directories are never synced either
    let reports = sync_all(&settings, &seeded_server());
    assert_eq!(reports.len(), 1);
    assert!(!paths::content_dir(&git_only).exists());
}

#[test]
fn marker_removed_blocks_destroy_and_keeps_contents() {
    let data = TempDir::new().unwrap();
    let settings = Settings::new(data.path());
    let path = archive(&settings, "pads");
    sync_all(&settings, &seeded_server());

    let marker = paths::marker_path(&path);
    let backup = path.join(".webtogit_backup");
    fs::rename(&marker, &backup).unwrap();
    let before = listing(&path);
    let pads_before = listing(&paths::content_dir(&path));

    let err = destroy_repo(&path, false).unwrap_err();
    assert!(matches!(err, SyncError::UnsafeDeletion { .. }));
    assert!(matches!(
        destroy_repo(&path, true).unwrap(),
        DestroyOutcome::Skipped(_)
    ));
    assert_eq!(listing(&path), before);
    assert_eq!(listing(&paths::content_dir(&path)), pads_before);

    fs::rename(&backup, &marker).unwrap();
    assert!(matches!(
        destroy_repo(&path, false).unwrap(),
        DestroyOutcome::Removed(_)
    ));
    assert!(!path.exists());
    assert!(listing(data.path()).is_empty());
}

#[test]
fn log_like_source_names_are_archived() {
    let data = TempDir::new().unwrap();
    let settings = Settings::new(data.path());
    let path = archive(&settings, "pads");
    fs::write(
        paths::manifest_path(&path),
        "- https://pads.example.org/p/log\n\
         - \"https://pads.example.org/p/server\":\n    name: server.log\n\
         - https://pads.example.org/p/ok\n",
    )
    .unwrap();
    let server = PadServer::default();
    for pad in ["log", "server", "ok"] {
        server.set(&format!("https://pads.example.org/p/{pad}"), pad);
    }

    let reports = sync_all(&settings, &server);
    let summary = reports[0].outcome.as_ref().expect("sync");
    assert_eq!(summary.fetched, 3);
    assert_eq!(
        summary.changed,
        ["pads/log.txt", "pads/ok.txt", "pads/server.log"]
    );
}

#[test]
fn lock_file_left_by_interrupted_run_does_not_block_sync() {
    let data = TempDir::new().unwrap();
    let settings = Settings::new(data.path());
    let path = archive(&settings, "pads");
    fs::write(paths::lock_path(&path), "4194304\n").unwrap();

    let reports = sync_all(&settings, &seeded_server());
    assert_eq!(reports[0].outcome.as_ref().expect("sync").changed.len(), 3);
}
