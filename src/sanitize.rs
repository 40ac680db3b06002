//! ゲーム名をディレクトリ名として使える形に変換する

use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 空名プレースホルダの連番（プロセス全体で共有）
static EMPTY_NAME_SEQ: AtomicUsize = AtomicUsize::new(1);

pub const EMPTY_NAME_PREFIX: &str = "Empty GameName ";

lazy_static::lazy_static! {
    // Windowsでファイル名に使えない文字
    static ref INVALID_CHARS_RE: Regex = Regex::new(r#"[\\/:*?"<>|]"#).unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 表示名をパス要素1つ分の安全な文字列に変換
///
/// 結果が空、または `.` / `..` のようにドットだけになる場合は `Empty GameName <n>` を返す。
/// `n` は呼び出しごとに増える。
pub fn sanitize(raw: &str) -> String {
    let replaced = INVALID_CHARS_RE.replace_all(raw, "_");
    let collapsed = WHITESPACE_RE.replace_all(&replaced, " ");
    let trimmed = collapsed.trim();

    // ドットだけの名前は親/カレントディレクトリを指してしまう
    if trimmed.chars().all(|c| c == '.') {
        let n = EMPTY_NAME_SEQ.fetch_add(1, Ordering::Relaxed);
        return format!("{}{}", EMPTY_NAME_PREFIX, n);
    }
    trimmed.to_string()
}
