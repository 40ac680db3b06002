//! ファイル名・ディレクトリ名の判定

use regex::Regex;

lazy_static::lazy_static! {
    // appid_timestamp_sequence.ext
    static ref SCREENSHOT_RE: Regex =
        Regex::new(r"^\d+_\d+_\d+\.(png|jpg|jpeg|avif)$").unwrap();
}

/// 空でない10進数字列か
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Steamスクリーンショットのファイル名パターンに完全一致するか
pub fn is_screenshot_file(name: &str) -> bool {
    SCREENSHOT_RE.is_match(name)
}

/// ファイル名先頭のappidを取り出す
pub fn screenshot_identifier(name: &str) -> Option<&str> {
    name.split('_')
        .next()
        .filter(|id| is_valid_identifier(id))
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
