//! Manifest loading from disk: error messages carry the manifest path.

use assert_fs::prelude::*;
use predicates::prelude::*;
use webtogit_core::{manifest, naming::resolve_name, ManifestError};

#[test]
fn loads_three_entry_manifest() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("sources.yml");
    file.write_str(
        "- https://h/p/a\n- \"https://h/p/b\":\n    name: renamed.md\n- https://h/p/c\n",
    )
    .expect("write");

    let records = manifest::load(file.path()).expect("load");
    let names: Vec<_> = records.iter().map(|r| r.name.clone()).collect();
    assert_eq!(names, ["a.txt", "renamed.md", "c.txt"]);

    // Bare entries always carry the resolver's name.
    for r in records.iter().filter(|r| r.url != "https://h/p/b") {
        assert_eq!(r.name, resolve_name(&r.url).unwrap());
    }
}

#[test]
fn missing_manifest_is_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = manifest::load(&dir.path().join("sources.yml")).unwrap_err();
    assert!(matches!(err, ManifestError::ManifestNotFound { .. }), "got: {err}");
    assert!(predicate::str::contains("sources.yml").eval(&err.to_string()));
}

#[test]
fn corrupt_yaml_is_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("sources.yml");
    file.write_str("- [unclosed\n").expect("write");

    let err = manifest::load(file.path()).unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("sources.yml"));
}

#[test]
fn load_does_not_touch_the_file() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("sources.yml");
    let body = "- https://h/p/a\n";
    file.write_str(body).expect("write");

    manifest::load(file.path()).expect("load");
    file.assert(body);
}
