use crate::config::Config;
use crate::organizer::Layout;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "steam-screenshot-organizer", version)]
#[command(about = "Sort Steam screenshots into per-game folders", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 作業ディレクトリ（スクリーンショットのある場所）
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// フォルダ構成 (1: 直下にファイル / 2: <appid>/screenshots)。省略時は対話式で選択
    #[arg(short, long, global = true)]
    pub mode: Option<Layout>,

    /// カタログのキャッシュファイル（相対パスは作業ディレクトリ基準）
    #[arg(long, global = true)]
    pub cache_file: Option<PathBuf>,

    /// アプリ一覧の取得元URL
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// ワーカースレッド数
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// 全タスクの完了を待つ上限（秒）
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// 終了前にEnter待ちをしない
    #[arg(long, global = true)]
    pub no_pause: bool,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// スクリーンショットを整理（デフォルト）
    Organize,

    /// カタログのキャッシュ管理
    Catalog {
        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,

        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 再ダウンロード（失敗時は既存キャッシュを残す）
        #[arg(long)]
        refresh: bool,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    /// コマンドライン指定で設定を上書き
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(cache_file) = &self.cache_file {
            config.cache_file = cache_file.clone();
        }
        if let Some(url) = &self.catalog_url {
            config.catalog_url = url.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(secs) = self.timeout_secs {
            config.wait_timeout_secs = secs;
        }
        if self.no_pause {
            config.pause_on_exit = false;
        }
    }

    /// キャッシュファイルの実パス
    pub fn cache_path(&self, config: &Config) -> PathBuf {
        if config.cache_file.is_absolute() {
            config.cache_file.clone()
        } else {
            self.dir.join(&config.cache_file)
        }
    }
}
