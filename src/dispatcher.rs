//! 整理タスクの並列実行
//!
//! 候補1件につき1タスクをrayonのスレッドプールへ投げ、完了通知をチャネルで
//! 受け取る。待ち時間の上限を超えたら待つのをやめて戻る。実行中のタスクは
//! 中断されず、プールの破棄後もバックグラウンドで最後まで走る（結果は観測しない）。

use crate::config::Config;
use crate::error::{OrganizerError, Result};
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 実行結果の集計（最終行の表示用）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: bool,
}

impl DispatchSummary {
    /// 待ち時間切れで結果が分からないタスク数
    pub fn unfinished(&self) -> usize {
        self.submitted - self.succeeded - self.failed
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    workers: usize,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(workers: usize, timeout: Duration) -> Self {
        Self {
            workers: workers.max(1),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.worker_count(), config.wait_timeout())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 各アイテムに `job` を並列適用する
    ///
    /// 失敗したアイテムはその場でエラー出力へ報告し、他のアイテムは続行する。
    pub fn run<T, F>(&self, items: Vec<T>, job: F) -> Result<DispatchSummary>
    where
        T: fmt::Display + Send + 'static,
        F: Fn(T) -> Result<()> + Send + Sync + 'static,
    {
        let mut summary = DispatchSummary {
            submitted: items.len(),
            ..Default::default()
        };
        if items.is_empty() {
            return Ok(summary);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("organizer-{}", i))
            .panic_handler(|_| log::error!("worker task panicked"))
            .build()
            .map_err(|e| OrganizerError::WorkerPool(e.to_string()))?;
        log::debug!(
            "dispatching {} tasks on {} workers",
            summary.submitted,
            self.workers
        );

        let job = Arc::new(job);
        let (tx, rx) = mpsc::channel::<bool>();

        for item in items {
            let job = Arc::clone(&job);
            let tx = tx.clone();
            pool.spawn(move || {
                let label = item.to_string();
                let ok = match (*job)(item) {
                    Ok(()) => true,
                    Err(e) => {
                        eprintln!("Error processing {}: {}", label, e);
                        log::debug!("{} failed: {:?}", label, e);
                        false
                    }
                };
                // 待ち時間切れの後は受信側がいない
                let _ = tx.send(ok);
            });
        }
        drop(tx);

        // 上限が大きすぎて時刻に足せない場合は期限なしで待つ
        let deadline = Instant::now().checked_add(self.timeout);
        while summary.succeeded + summary.failed < summary.submitted {
            let received = match deadline {
                Some(deadline) => {
                    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(true) => summary.succeeded += 1,
                Ok(false) => summary.failed += 1,
                Err(RecvTimeoutError::Timeout) => {
                    summary.timed_out = true;
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    // パニックしたタスクは通知を送らない
                    summary.failed = summary.submitted - summary.succeeded;
                    break;
                }
            }
        }

        if summary.timed_out {
            println!(
                "Warning: Some file processing timed out ({} of {} tasks unfinished)",
                summary.unfinished(),
                summary.submitted
            );
        }
        Ok(summary)
    }
}
