//! Temporary directory integration tests.
//!
//! These run against the real platform temp root.

use base_util::{temp_root, Error, Identifier, TempDirectory};
use std::fs;

/// Test that a named directory lands directly below the temp root.
#[test]
fn test_named_directory_below_temp_root() {
    let name = format!("base-util-it-{}", Identifier::uuid());
    let dir = TempDirectory::named(&name).expect("Failed to create temp dir");

    let root = temp_root().unwrap();
    assert_eq!(dir.path(), root.join(&name));
    assert!(dir.path().starts_with(&root));
    assert!(dir.path().is_dir());
}

/// Test that traversal outside the temp root fails.
#[test]
fn test_traversal_outside_temp_root_fails() {
    for name in [
        "../../etc",
        "..",
        "/etc",
        "../base-util-escape",
        "missing/../../etc",
        "missing/../..",
        "x/..",
    ] {
        let err = TempDirectory::new(Some(name), true).unwrap_err();
        assert!(
            matches!(err, Error::PathEscape { .. }),
            "{name}: expected path escape, got {err}"
        );
    }
}

/// Test that the directory is writable right after construction.
#[test]
fn test_directory_writable_after_construction() -> anyhow::Result<()> {
    let dir = TempDirectory::create()?;
    let marker = dir.path().join("marker.txt");
    fs::write(&marker, "ok")?;
    assert_eq!(fs::read_to_string(&marker)?, "ok");
    Ok(())
}

/// Test the temp file naming rules.
#[test]
fn test_temp_file_names() {
    let dir = TempDirectory::create().unwrap();

    let draft = dir.temp_file(Some("draft"), Some("txt")).unwrap();
    let again = dir.temp_file(Some("draft"), Some("txt")).unwrap();
    assert_ne!(draft, again);

    let name = draft.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("draft "));
    assert!(name.ends_with(".txt"));

    let json = dir.temp_file(None, Some("json")).unwrap();
    let name = json.file_name().unwrap().to_str().unwrap();
    assert!(name.ends_with(".json"));
    assert!(!name.starts_with(' '));
    assert!(Identifier::is_uuid(name.trim_end_matches(".json")));
}

/// Test that scope exit removes the directory when asked to.
#[test]
fn test_scope_exit_with_clean_on_exit() {
    let dir = TempDirectory::new(None, true).unwrap();
    {
        let scope = dir.enter().unwrap();
        fs::write(scope.temp_file(Some("data"), Some("bin")).unwrap(), [0u8; 16]).unwrap();
    }
    assert!(!dir.path().exists());
}

/// Test that scope exit keeps the directory when cleaning is disabled.
#[test]
fn test_scope_exit_without_clean_on_exit() {
    let dir = TempDirectory::new(None, false).unwrap();
    let file = {
        let scope = dir.enter().unwrap();
        scope.temp_file(Some("report"), Some("csv")).unwrap()
    };

    assert!(dir.path().is_dir());
    fs::write(&file, "a,b\n1,2\n").expect("Generated name should stay a valid target");

    let path = dir.path().to_path_buf();
    drop(dir);
    assert!(!path.exists());
}

/// Test that an externally removed directory is recreated transparently.
#[test]
fn test_external_removal_is_repaired() {
    let dir = TempDirectory::create().unwrap();
    fs::remove_dir_all(dir.path()).unwrap();

    let file = dir.temp_file(None, None).unwrap();
    assert!(dir.path().is_dir());
    assert_eq!(file.parent(), Some(dir.path()));
    fs::write(&file, "restored").unwrap();
}

/// Test that an existing directory is reused rather than rejected.
#[test]
fn test_existing_directory_is_reused() {
    let name = format!("base-util-reuse-{}", Identifier::uuid());
    let path = temp_root().unwrap().join(&name);
    fs::create_dir(&path).unwrap();
    fs::write(path.join("existing.txt"), "kept").unwrap();

    let dir = TempDirectory::new(Some(&name), false).unwrap();
    assert_eq!(dir.path(), path);
    assert_eq!(
        fs::read_to_string(dir.path().join("existing.txt")).unwrap(),
        "kept"
    );
}

/// Test that exiting twice does not fail.
#[test]
fn test_double_exit() {
    let dir = TempDirectory::create().unwrap();
    drop(dir.enter().unwrap());
    dir.exit();
    dir.release();
    assert!(!dir.path().exists());
}

/// Test that `keep` leaves the directory behind.
#[test]
fn test_keep() {
    let dir = TempDirectory::create().unwrap();
    let path = dir.keep();
    assert!(path.is_dir());
    fs::remove_dir_all(&path).unwrap();
}
