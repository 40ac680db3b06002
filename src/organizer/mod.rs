//! スクリーンショットをゲーム名のディレクトリへ移動・コピーする

mod transfer;

pub use transfer::{place, TransferMode};

use crate::catalog::Catalog;
use crate::classifier;
use crate::dispatcher::{DispatchSummary, Dispatcher};
use crate::error::{OrganizerError, Result};
use crate::scanner::{self, GameDir, ScreenshotFile};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// モード2の出力先ディレクトリ名
pub const SCREEN_PACKS_DIR: &str = "screenPacks";

/// スクリーンショットフォルダの構成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 1: 作業ディレクトリ直下に `appid_timestamp_sequence.ext` が並ぶ（移動）
    Loose,
    /// 2: `<appid>/screenshots/*` の形（コピー、元は残す）
    Nested,
}

impl Layout {
    pub fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            1 => Some(Layout::Loose),
            2 => Some(Layout::Nested),
            _ => None,
        }
    }

    pub fn choice(&self) -> u8 {
        match self {
            Layout::Loose => 1,
            Layout::Nested => 2,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Layout::Loose => {
                "Screenshots are directly in the current directory (format: appid_timestamp_sequence.png)"
            }
            Layout::Nested => "Screenshots are in the 'screenshots' subdirectory of each game",
        }
    }

    pub fn transfer_mode(&self) -> TransferMode {
        match self {
            Layout::Loose => TransferMode::Move,
            Layout::Nested => TransferMode::Copy,
        }
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "loose" => Ok(Layout::Loose),
            "2" | "nested" => Ok(Layout::Nested),
            _ => Err(format!("Unknown mode: {}. Use 1 (loose) or 2 (nested)", s)),
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.choice())
    }
}

/// 1件分の整理処理。カタログは読み取り専用で全タスクから共有する
#[derive(Debug, Clone)]
pub struct Organizer {
    root: PathBuf,
    catalog: Arc<Catalog>,
}

impl Organizer {
    pub fn new(root: impl Into<PathBuf>, catalog: Arc<Catalog>) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    pub fn target_dir(&self, layout: Layout, app_id: &str) -> PathBuf {
        let game_name = self.catalog.resolve(app_id);
        match layout {
            Layout::Loose => self.root.join(game_name),
            Layout::Nested => self.root.join(SCREEN_PACKS_DIR).join(game_name),
        }
    }

    /// モード1: ファイル1つを `<root>/<GameName>/` へ移動
    pub fn organize_file(&self, file: &ScreenshotFile) -> Result<()> {
        let app_id = classifier::screenshot_identifier(&file.file_name)
            .ok_or_else(|| OrganizerError::InvalidIdentifier(file.file_name.clone()))?;

        let target_dir = self.target_dir(Layout::Loose, app_id);
        place(
            &file.path,
            &target_dir,
            &file.file_name,
            Layout::Loose.transfer_mode(),
        )
    }

    /// モード2: `<appid>/screenshots` 直下のファイルを順にコピー
    ///
    /// 途中で失敗したらそのディレクトリの残りは処理しない。
    pub fn organize_game_dir(&self, dir: &GameDir) -> Result<usize> {
        let screenshots = dir.screenshots_dir();
        if !screenshots.is_dir() {
            log::debug!("{} has no screenshots directory", dir.path.display());
            return Ok(0);
        }

        let target_dir = self.target_dir(Layout::Nested, &dir.app_id);
        let files = scanner::list_regular_files(&screenshots)?;
        let mode = Layout::Nested.transfer_mode();
        for path in &files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            place(path, &target_dir, &file_name, mode)?;
        }
        Ok(files.len())
    }
}

/// 作業ディレクトリを走査し、候補ごとに並列で整理する
pub fn organize(
    root: &Path,
    catalog: Arc<Catalog>,
    layout: Layout,
    dispatcher: &Dispatcher,
) -> Result<DispatchSummary> {
    let organizer = Arc::new(Organizer::new(root, catalog));

    match layout {
        Layout::Loose => {
            let files = scanner::scan_screenshot_files(root)?;
            log::debug!("found {} loose screenshots", files.len());
            dispatcher.run(files, move |file| organizer.organize_file(&file))
        }
        Layout::Nested => {
            let dirs = scanner::scan_game_dirs(root)?;
            log::debug!("found {} game directories", dirs.len());
            if !dirs.is_empty() {
                std::fs::create_dir_all(root.join(SCREEN_PACKS_DIR))?;
            }
            dispatcher.run(dirs, move |dir| organizer.organize_game_dir(&dir).map(|_| ()))
        }
    }
}
