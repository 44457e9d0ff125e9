//! Tests for the command-line binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Write a settings file pointing at the fixtures; output goes to the temp dir.
fn write_settings(dir: &TempDir) -> PathBuf {
    write_settings_with_catalog(dir, &fixtures().join("toc.json"))
}

/// Same as [`write_settings`] with a catalog listing only volumes that have text.
fn write_complete_settings(dir: &TempDir) -> PathBuf {
    let full: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fixtures().join("toc.json")).unwrap()).unwrap();
    let catalog = serde_json::json!({"ba": full["ba"], "bb": full["bb"]});
    let toc = dir.path().join("toc.json");
    fs::write(&toc, catalog.to_string()).unwrap();
    write_settings_with_catalog(dir, &toc)
}

fn write_settings_with_catalog(dir: &TempDir, toc: &Path) -> PathBuf {
    let settings = serde_json::json!([{
        "scraper": {"edition": "2"},
        "segmenter": {
            "input_dir": fixtures().join("text"),
            "segmentedDirectory": dir.path().join("segmented"),
            "segmentedFile": "articles.json",
            "paragraphIndexesFile": "paragraph_indexes.json",
            "toc_file": toc,
            "truncate_after": [{"volume": "bb", "headword": "Backa"}]
        }
    }]);
    let path = dir.path().join("settings.json");
    fs::write(&path, settings.to_string()).unwrap();
    path
}

#[test]
fn test_segment_then_already_done() {
    let dir = tempdir().unwrap();
    let settings = write_complete_settings(&dir);

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["segment", "--settings"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Articles: 8"));

    assert!(dir.path().join("segmented/articles.json").exists());
    assert!(dir.path().join("segmented/paragraph_indexes.json").exists());

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["segment", "--settings"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Segmentation already done!"));
}

#[test]
fn test_segment_retries_skipped_volume() {
    let dir = tempdir().unwrap();
    let settings = write_settings(&dir);

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["segment", "--settings"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Articles: 8"))
        .stdout(predicate::str::contains("bc"));

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["segment", "--settings"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("resumed"))
        .stdout(predicate::str::contains("bc"))
        .stdout(predicate::str::contains("Segmentation already done!").not());
}

#[test]
fn test_scan_then_assemble() {
    let dir = tempdir().unwrap();
    let settings = write_settings(&dir);

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["scan", "--settings"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Boundaries: 8"));
    assert!(!dir.path().join("segmented/articles.json").exists());

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["assemble", "--settings"])
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Articles: 8"));
    assert!(dir.path().join("segmented/articles.json").exists());
}

#[test]
fn test_assemble_without_index_fails() {
    let dir = tempdir().unwrap();
    let settings = write_settings(&dir);

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["assemble", "--settings"])
        .arg(&settings)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Boundary index does not exist"));
}

#[test]
fn test_classify_line() {
    let dir = tempdir().unwrap();
    let settings = write_settings(&dir);

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["classify", "--volume", "ba", "--cursor", "3", "--settings"])
        .arg(&settings)
        .arg("Abbe")
        .assert()
        .success()
        .stdout(predicate::str::contains("boundary"))
        .stdout(predicate::str::contains("Abbe"));

    cargo_bin_cmd!("familjebok-segmenter")
        .args(["classify", "--volume", "ba", "--settings"])
        .arg(&settings)
        .arg("Staden har gamla anor")
        .assert()
        .success()
        .stdout(predicate::str::contains("rejected"));
}

#[test]
fn test_missing_settings_file() {
    cargo_bin_cmd!("familjebok-segmenter")
        .args(["segment", "--settings", "/nonexistent/settings.json"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Invalid settings"));
}
