//! 整理処理のエンドツーエンドテスト

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use steam_screenshot_organizer::catalog::{parse_catalog, Catalog};
use steam_screenshot_organizer::dispatcher::Dispatcher;
use steam_screenshot_organizer::organizer::{organize, Layout, SCREEN_PACKS_DIR};
use tempfile::tempdir;

fn catalog() -> Arc<Catalog> {
    let content = r#"{"applist":{"apps":[
        {"appid":100,"name":"My Game"},
        {"appid":730,"name":"Counter-Strike: Global Offensive"}
    ]}}"#;
    Arc::new(parse_catalog(content).unwrap())
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(4, Duration::from_secs(30))
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"image").unwrap();
}

/// モード1: カタログにあるappidはゲーム名のフォルダへ移動
#[test]
fn test_loose_moves_into_game_dir() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("100_111_1.png"));

    let summary = organize(dir.path(), catalog(), Layout::Loose, &dispatcher()).unwrap();

    assert!(dir.path().join("My Game").join("100_111_1.png").exists());
    assert!(!dir.path().join("100_111_1.png").exists());
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
}

/// モード1: 未登録のappidはappid名のフォルダ、対象外のファイルはそのまま
#[test]
fn test_loose_mixed_directory() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("730_20240101_1.jpg"));
    touch(&dir.path().join("730_20240101_2.jpg"));
    touch(&dir.path().join("999_1_1.avif"));
    touch(&dir.path().join("notes.txt"));
    touch(&dir.path().join("100_111_1.png.bak"));

    let summary = organize(dir.path(), catalog(), Layout::Loose, &dispatcher()).unwrap();
    assert_eq!(summary.submitted, 3);
    assert_eq!(summary.succeeded, 3);

    let csgo = dir.path().join("Counter-Strike_ Global Offensive");
    assert!(csgo.join("730_20240101_1.jpg").exists());
    assert!(csgo.join("730_20240101_2.jpg").exists());
    assert!(dir.path().join("999").join("999_1_1.avif").exists());
    assert!(dir.path().join("notes.txt").exists());
    assert!(dir.path().join("100_111_1.png.bak").exists());
}

/// ドットだけのゲーム名でも作業ディレクトリの外には出ない
#[test]
fn test_dot_names_stay_inside_root() {
    let parent = tempdir().unwrap();
    let root = parent.path().join("shots");
    touch(&root.join("100_1_1.png"));
    touch(&root.join("200_1_1.png"));

    let content = r#"{"applist":{"apps":[
        {"appid":100,"name":".."},
        {"appid":200,"name":"."}
    ]}}"#;
    let catalog = Arc::new(parse_catalog(content).unwrap());
    let summary = organize(&root, catalog, Layout::Loose, &dispatcher()).unwrap();

    assert_eq!(summary.succeeded, 2);
    assert!(!parent.path().join("100_1_1.png").exists());
    assert!(!root.join("200_1_1.png").exists());

    let placed: Vec<_> = fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_dir())
        .collect();
    assert_eq!(placed.len(), 2);
    for dir in placed {
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Empty GameName "), "{}", name);
    }
}

/// モード1を2回実行しても2回目は何もしない
#[test]
fn test_loose_is_idempotent() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("100_111_1.png"));
    touch(&dir.path().join("100_111_2.png"));

    organize(dir.path(), catalog(), Layout::Loose, &dispatcher()).unwrap();
    let second = organize(dir.path(), catalog(), Layout::Loose, &dispatcher()).unwrap();

    assert_eq!(second.submitted, 0);
    assert_eq!(second.failed, 0);
    assert_eq!(fs::read_dir(dir.path().join("My Game")).unwrap().count(), 2);
}

/// モード1: 出力先に同名のファイルがある場合はそのファイルだけ失敗
#[test]
fn test_loose_failure_does_not_stop_batch() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("My Game"), b"blocking file").unwrap();
    touch(&dir.path().join("100_111_1.png"));
    touch(&dir.path().join("730_1_1.png"));

    let summary = organize(dir.path(), catalog(), Layout::Loose, &dispatcher()).unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 1);
    assert!(dir.path().join("100_111_1.png").exists());
    assert!(dir
        .path()
        .join("Counter-Strike_ Global Offensive")
        .join("730_1_1.png")
        .exists());
}

/// モード2: コピーなので元ファイルは残る
#[test]
fn test_nested_copies_into_screen_packs() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("200").join("screenshots").join("shot.jpg"));

    let summary = organize(dir.path(), catalog(), Layout::Nested, &dispatcher()).unwrap();

    assert!(dir.path().join(SCREEN_PACKS_DIR).join("200").join("shot.jpg").exists());
    assert!(dir.path().join("200").join("screenshots").join("shot.jpg").exists());
    assert_eq!(summary.succeeded, 1);
}

/// モード2: ゲーム名の解決、サブディレクトリと対象外ディレクトリの扱い
#[test]
fn test_nested_layout_details() {
    let dir = tempdir().unwrap();
    let shots = dir.path().join("100").join("screenshots");
    touch(&shots.join("a.jpg"));
    touch(&shots.join("b.png"));
    touch(&shots.join("thumbnails").join("a.jpg"));
    touch(&dir.path().join("730").join("readme.txt"));
    touch(&dir.path().join("mods").join("screenshots").join("x.jpg"));

    let summary = organize(dir.path(), catalog(), Layout::Nested, &dispatcher()).unwrap();

    let target = dir.path().join(SCREEN_PACKS_DIR).join("My Game");
    assert!(target.join("a.jpg").exists());
    assert!(target.join("b.png").exists());
    assert!(!target.join("thumbnails").exists());
    assert!(!dir.path().join(SCREEN_PACKS_DIR).join("mods").exists());
    assert!(!dir
        .path()
        .join(SCREEN_PACKS_DIR)
        .join("Counter-Strike_ Global Offensive")
        .exists());
    assert_eq!(summary.submitted, 2);
    assert_eq!(summary.failed, 0);
}

/// モード2: 対象がなければscreenPacksは作らない
#[test]
fn test_nested_nothing_to_do() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("100_111_1.png"));

    let summary = organize(dir.path(), catalog(), Layout::Nested, &dispatcher()).unwrap();

    assert_eq!(summary.submitted, 0);
    assert!(!dir.path().join(SCREEN_PACKS_DIR).exists());
    assert!(dir.path().join("100_111_1.png").exists());
}

/// 同じゲームのファイルが大量にあっても全て移動される
#[test]
fn test_many_files_same_game() {
    let dir = tempdir().unwrap();
    for i in 0..50 {
        touch(&dir.path().join(format!("100_{}_{}.jpg", 1000 + i, i)));
    }

    let summary = organize(dir.path(), catalog(), Layout::Loose, &dispatcher()).unwrap();

    assert_eq!(summary.succeeded, 50);
    assert_eq!(fs::read_dir(dir.path().join("My Game")).unwrap().count(), 50);
}

/// 作業ディレクトリが存在しない
#[test]
fn test_missing_root() {
    let dir = tempdir().unwrap();
    let result = organize(
        &dir.path().join("missing"),
        catalog(),
        Layout::Loose,
        &dispatcher(),
    );
    assert!(result.is_err());
}
