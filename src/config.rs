use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Steam公式のアプリ一覧API
pub const DEFAULT_CATALOG_URL: &str = "https://api.steampowered.com/ISteamApps/GetAppList/v2/";

/// カタログのキャッシュファイル名（作業ディレクトリ相対）
pub const DEFAULT_CACHE_FILE: &str = "app.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog_url: String,
    pub cache_file: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// ダウンロード進捗（受信バイト数）の更新間隔
    pub progress_interval_ms: u64,
    /// 全タスク完了を待つ上限
    pub wait_timeout_secs: u64,
    /// ワーカー数（未指定時はCPU並列度）
    pub workers: Option<usize>,
    pub pause_on_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.into(),
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            connect_timeout_secs: 15,
            request_timeout_secs: 60,
            progress_interval_ms: 2500,
            wait_timeout_secs: 600,
            workers: None,
            pause_on_exit: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            log::debug!("loaded config from {}", config_path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OrganizerError::Config("home directory not found".into()))?;
        Ok(home
            .join(".config")
            .join("steam-screenshot-organizer")
            .join("config.json"))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// ワーカー数を決定（0指定は自動扱い）
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}
