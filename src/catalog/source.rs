//! カタログの取得元

use crate::config::Config;
use crate::error::{OrganizerError, Result};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::{Duration, Instant};

/// カタログの取得元（テストでは差し替える）
pub trait CatalogSource {
    /// 表示用の取得元の説明
    fn describe(&self) -> String;

    /// ペイロードを `dest` に書き込み、書き込んだバイト数を返す
    fn fetch(&self, dest: &mut dyn Write) -> Result<u64>;
}

/// Steam Web APIからHTTPで取得する
#[derive(Debug, Clone)]
pub struct HttpSource {
    pub url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub progress_interval: Duration,
}

impl HttpSource {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.catalog_url.clone(),
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
            progress_interval: config.progress_interval(),
        }
    }

    async fn stream_to(&self, dest: &mut dyn Write, progress: &ProgressBar) -> Result<u64> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()?;

        let mut response = client.get(&self.url).send().await?.error_for_status()?;
        if let Some(len) = response.content_length() {
            log::debug!("catalog response length: {} bytes", len);
        }

        // 全体をメモリに載せず、チャンクごとに書き出す
        let mut total = 0u64;
        let mut report = ReportInterval::new(self.progress_interval);
        while let Some(chunk) = response.chunk().await? {
            dest.write_all(&chunk)?;
            total += chunk.len() as u64;
            if report.due(Instant::now()) {
                progress.set_position(total);
            }
        }
        progress.set_position(total);
        dest.flush()?;
        Ok(total)
    }
}

impl CatalogSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self, dest: &mut dyn Write) -> Result<u64> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let progress = download_progress(self.progress_interval);
        let result = runtime.block_on(self.stream_to(dest, &progress));
        progress.finish_and_clear();

        let total = result?;
        println!("Download completed. Total size: {}", HumanBytes(total));
        Ok(total)
    }
}

/// 受信バイト数の更新を一定間隔に間引く
struct ReportInterval {
    interval: Duration,
    last: Option<Instant>,
}

impl ReportInterval {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// 一定時間ごとに再描画されるダウンロード進捗
fn download_progress(interval: Duration) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} Downloaded: {bytes} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    progress.set_style(style);
    progress.enable_steady_tick(interval);
    progress
}

/// 取得に失敗したら `DownloadFailed` に変換するヘルパー
pub(crate) fn download_failed(source: &dyn CatalogSource, err: OrganizerError) -> OrganizerError {
    OrganizerError::DownloadFailed(format!("{}: {}", source.describe(), err))
}
