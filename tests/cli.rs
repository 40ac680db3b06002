use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const CACHE: &str = r#"{"applist":{"apps":[{"appid":100,"name":"My Game"}]}}"#;

/// HOMEを一時ディレクトリに向けて設定ファイルの影響を受けないようにする
fn organizer(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("steam-screenshot-organizer").unwrap();
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

fn setup_shots(dir: &Path) {
    fs::write(dir.join("app.json"), CACHE).unwrap();
    fs::write(dir.join("100_111_1.png"), b"png").unwrap();
}

#[test]
fn test_version() {
    let home = tempdir().unwrap();
    organizer(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_organize_with_mode_flag() {
    let home = tempdir().unwrap();
    let shots = tempdir().unwrap();
    setup_shots(shots.path());

    organizer(&home)
        .arg("--dir")
        .arg(shots.path())
        .args(["--mode", "1", "--no-pause"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved: 100_111_1.png -> My Game"))
        .stdout(predicate::str::contains("Organization completed!"));

    assert!(shots.path().join("My Game").join("100_111_1.png").exists());
    assert!(!shots.path().join("100_111_1.png").exists());
}

#[test]
fn test_organize_reads_choice_from_stdin() {
    let home = tempdir().unwrap();
    let shots = tempdir().unwrap();
    setup_shots(shots.path());

    organizer(&home)
        .arg("--dir")
        .arg(shots.path())
        .arg("--no-pause")
        .write_stdin("abc\n5\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter a number"))
        .stdout(predicate::str::contains("Please enter 1 or 2"))
        .stdout(predicate::str::contains("Organization completed!"));

    assert!(shots.path().join("My Game").join("100_111_1.png").exists());
}

#[test]
fn test_nested_mode_copies() {
    let home = tempdir().unwrap();
    let shots = tempdir().unwrap();
    fs::write(shots.path().join("app.json"), CACHE).unwrap();
    let source = shots.path().join("200").join("screenshots");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("shot.jpg"), b"jpg").unwrap();

    organizer(&home)
        .arg("--dir")
        .arg(shots.path())
        .args(["--mode", "2", "--no-pause"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied: shot.jpg -> 200"));

    assert!(shots.path().join("screenPacks").join("200").join("shot.jpg").exists());
    assert!(source.join("shot.jpg").exists());
}

/// ダウンロードに失敗したら何も整理せずエラー終了
#[test]
fn test_download_failure_is_fatal() {
    let home = tempdir().unwrap();
    let shots = tempdir().unwrap();
    fs::write(shots.path().join("100_111_1.png"), b"png").unwrap();

    organizer(&home)
        .arg("--dir")
        .arg(shots.path())
        .args(["--mode", "1", "--catalog-url", "http://127.0.0.1:9/apps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Catalog unavailable"))
        .stderr(predicate::str::contains("Details:"))
        .stdout(predicate::str::contains("Press Enter to exit..."));

    assert!(shots.path().join("100_111_1.png").exists());
    assert!(!shots.path().join("app.json").exists());
    assert!(!shots.path().join("app.json.part").exists());
}

#[test]
fn test_corrupted_cache_suggests_deleting() {
    let home = tempdir().unwrap();
    let shots = tempdir().unwrap();
    fs::write(shots.path().join("app.json"), "not json").unwrap();

    organizer(&home)
        .arg("--dir")
        .arg(shots.path())
        .args(["--mode", "1", "--no-pause"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Consider deleting"))
        .stderr(predicate::str::contains("Invalid app list format"));
}

#[test]
fn test_catalog_info_and_clear() {
    let home = tempdir().unwrap();
    let shots = tempdir().unwrap();
    fs::write(shots.path().join("app.json"), CACHE).unwrap();

    organizer(&home)
        .arg("catalog")
        .arg("--dir")
        .arg(shots.path())
        .arg("--no-pause")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 1"));

    organizer(&home)
        .args(["catalog", "--clear", "--no-pause"])
        .arg("--dir")
        .arg(shots.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    assert!(!shots.path().join("app.json").exists());
}

#[test]
fn test_config_show() {
    let home = tempdir().unwrap();
    organizer(&home)
        .args(["config", "--show", "--no-pause", "--timeout-secs", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"wait_timeout_secs\": 42"));
}
