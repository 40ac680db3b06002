//! 作業ディレクトリ直下の整理対象を列挙する

use crate::classifier;
use crate::error::{OrganizerError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// モード1: 作業ディレクトリ直下のスクリーンショットファイル
#[derive(Debug, Clone)]
pub struct ScreenshotFile {
    pub path: PathBuf,
    pub file_name: String,
}

/// モード2: `<appid>/screenshots` を持つ（可能性のある）ゲームディレクトリ
#[derive(Debug, Clone)]
pub struct GameDir {
    pub path: PathBuf,
    pub app_id: String,
}

impl GameDir {
    pub fn screenshots_dir(&self) -> PathBuf {
        self.path.join("screenshots")
    }
}

impl fmt::Display for ScreenshotFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {}", self.path.display())
    }
}

impl fmt::Display for GameDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "directory {}", self.path.display())
    }
}

/// 直下のエントリのみ（再帰しない）
///
/// シンボリックリンクはリンク先の種類で判定する。
fn direct_children(folder: &Path) -> Result<impl Iterator<Item = DirEntry>> {
    if !folder.is_dir() {
        return Err(OrganizerError::FolderNotFound(folder.display().to_string()));
    }

    Ok(WalkDir::new(folder)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping unreadable entry: {}", err);
                None
            }
        }))
}

fn entry_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().to_string()
}

pub fn scan_screenshot_files(folder: &Path) -> Result<Vec<ScreenshotFile>> {
    let mut files: Vec<ScreenshotFile> = direct_children(folder)?
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let file_name = entry_name(&e);
            classifier::is_screenshot_file(&file_name).then(|| ScreenshotFile {
                path: e.into_path(),
                file_name,
            })
        })
        .collect();

    // ファイル名でソート
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

pub fn scan_game_dirs(folder: &Path) -> Result<Vec<GameDir>> {
    let mut dirs: Vec<GameDir> = direct_children(folder)?
        .filter(|e| e.file_type().is_dir() && !is_hidden_entry(e))
        .filter_map(|e| {
            let app_id = entry_name(&e);
            classifier::is_valid_identifier(&app_id).then(|| GameDir {
                path: e.into_path(),
                app_id,
            })
        })
        .collect();

    dirs.sort_by(|a, b| a.app_id.cmp(&b.app_id));
    Ok(dirs)
}

/// ディレクトリ直下の通常ファイル
pub fn list_regular_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = direct_children(dir)?
        .filter(|e| e.file_type().is_file())
        .map(DirEntry::into_path)
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(windows)]
fn is_hidden_entry(entry: &DirEntry) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    classifier::is_hidden(&entry_name(entry))
        || entry
            .metadata()
            .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
            .unwrap_or(false)
}

#[cfg(not(windows))]
fn is_hidden_entry(entry: &DirEntry) -> bool {
    classifier::is_hidden(&entry_name(entry))
}
