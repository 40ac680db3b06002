//! appid → ゲーム名カタログ
//!
//! キャッシュファイル（既定 `app.json`）があればそれを読み、なければ
//! 取得元から一度だけダウンロードしてキャッシュする。ダウンロードは
//! `<cache>.part` に書き出し、検証に通ったものだけを本来のパスへリネームするので、
//! 途中で失敗しても壊れたキャッシュは残らない。

pub mod parser;
pub mod source;

pub use parser::{has_catalog_marker, parse_catalog};
pub use source::{CatalogSource, HttpSource};

use crate::error::{OrganizerError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// appid → サニタイズ済みゲーム名（構築後は読み取り専用）
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    names: HashMap<String, String>,
}

impl Catalog {
    pub fn get(&self, app_id: &str) -> Option<&str> {
        self.names.get(app_id).map(String::as_str)
    }

    /// ゲーム名を引く。未登録ならappidそのもの
    pub fn resolve<'a>(&'a self, app_id: &'a str) -> &'a str {
        self.get(app_id).unwrap_or(app_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// キャッシュファイルの情報
#[derive(Debug, Clone)]
pub struct CatalogInfo {
    pub path: PathBuf,
    pub size: u64,
    pub entries: usize,
}

pub struct CatalogLoader<S: CatalogSource> {
    cache_path: PathBuf,
    source: S,
}

impl<S: CatalogSource> CatalogLoader<S> {
    pub fn new(cache_path: impl Into<PathBuf>, source: S) -> Self {
        Self {
            cache_path: cache_path.into(),
            source,
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// ダウンロード中の一時ファイル
    pub fn partial_path(&self) -> PathBuf {
        let mut name = self.cache_path.as_os_str().to_os_string();
        name.push(".part");
        PathBuf::from(name)
    }

    /// カタログを読み込む。キャッシュがなければ一度だけダウンロードする
    pub fn load(&self) -> Result<Catalog> {
        if self.cache_path.exists() {
            return self.read_cache();
        }

        println!(
            "{} not found. Downloading app list from {}...",
            self.cache_path.display(),
            self.source.describe()
        );
        self.download()
    }

    /// キャッシュの有無に関係なく取得し直す。失敗時は既存キャッシュを残す
    pub fn refresh(&self) -> Result<Catalog> {
        println!("Downloading app list from {}...", self.source.describe());
        self.download()
    }

    /// キャッシュファイルを削除。存在しなかった場合は `false`
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.cache_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn info(&self) -> Result<Option<CatalogInfo>> {
        if !self.cache_path.exists() {
            return Ok(None);
        }
        let size = std::fs::metadata(&self.cache_path)?.len();
        let catalog = self.read_cache()?;
        Ok(Some(CatalogInfo {
            path: self.cache_path.clone(),
            size,
            entries: catalog.len(),
        }))
    }

    fn read_cache(&self) -> Result<Catalog> {
        let display = self.cache_path.display().to_string();
        let content = std::fs::read_to_string(&self.cache_path).map_err(|e| {
            OrganizerError::CatalogUnavailable(format!("cannot read {}: {}", display, e))
        })?;

        let catalog = parse_catalog(&content)
            .map_err(|e| OrganizerError::CatalogFormat(format!("{}: {}", display, e)))?;

        if catalog.is_empty() {
            return Err(OrganizerError::CatalogEmpty(display));
        }
        log::debug!("loaded {} catalog entries from {}", catalog.len(), display);
        Ok(catalog)
    }

    fn download(&self) -> Result<Catalog> {
        let partial = self.partial_path();

        let result = self
            .fetch_to(&partial)
            .and_then(|_| self.validate(&partial))
            .and_then(|catalog| {
                std::fs::rename(&partial, &self.cache_path).map_err(|e| {
                    OrganizerError::DownloadFailed(format!(
                        "cannot write {}: {}",
                        self.cache_path.display(),
                        e
                    ))
                })?;
                Ok(catalog)
            });

        if result.is_err() {
            remove_if_exists(&partial);
        }
        result
    }

    fn fetch_to(&self, partial: &Path) -> Result<u64> {
        let file = File::create(partial)
            .map_err(|e| source::download_failed(&self.source, e.into()))?;
        let mut writer = BufWriter::new(file);

        let total = self
            .source
            .fetch(&mut writer)
            .and_then(|n| writer.flush().map(|_| n).map_err(Into::into))
            .map_err(|e| source::download_failed(&self.source, e))?;

        log::debug!("downloaded {} bytes to {}", total, partial.display());
        Ok(total)
    }

    /// 先頭のマーカー確認に加えて全体のパースも通す
    fn validate(&self, partial: &Path) -> Result<Catalog> {
        let bytes = std::fs::read(partial)?;

        if !has_catalog_marker(&bytes) {
            return Err(OrganizerError::DownloadInvalid(
                "app list marker not found near the start of the payload".into(),
            ));
        }

        let content = String::from_utf8(bytes)
            .map_err(|e| OrganizerError::DownloadInvalid(e.to_string()))?;
        let catalog =
            parse_catalog(&content).map_err(|e| OrganizerError::DownloadInvalid(e.to_string()))?;

        if catalog.is_empty() {
            return Err(OrganizerError::DownloadInvalid(
                "payload contains no valid entries".into(),
            ));
        }
        Ok(catalog)
    }
}

fn remove_if_exists(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            log::warn!("failed to remove {}: {}", path.display(), e);
        }
    }
}
