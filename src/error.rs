use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Failed to download app data: {0}")]
    DownloadFailed(String),

    #[error("Downloaded data is not a valid app list: {0}")]
    DownloadInvalid(String),

    #[error("Invalid app list format in {0}")]
    CatalogFormat(String),

    #[error("No valid entries found in {0}")]
    CatalogEmpty(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Invalid app id: {0}")]
    InvalidIdentifier(String),

    #[error("Failed to move file: {} -> {}: {cause}", .source_path.display(), .target_dir.display())]
    MoveFailed {
        source_path: PathBuf,
        target_dir: PathBuf,
        cause: String,
    },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrganizerError {
    /// カタログ段階の致命的エラーかどうか
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            OrganizerError::CatalogUnavailable(_)
                | OrganizerError::DownloadFailed(_)
                | OrganizerError::DownloadInvalid(_)
                | OrganizerError::CatalogFormat(_)
                | OrganizerError::CatalogEmpty(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OrganizerError>;
