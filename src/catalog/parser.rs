//! アプリ一覧ペイロードのパース
//!
//! 正規の形は `{"applist":{"apps":[{"appid":10,"name":"Counter-Strike"}, ...]}}`
//! だが、`appid` と `name` を持つオブジェクトであれば文書内のどこにあっても拾う。

use super::Catalog;
use crate::classifier::is_valid_identifier;
use crate::sanitize::sanitize;
use serde_json::Value;

/// 取得直後のペイロード検査で先頭から見るバイト数
const MARKER_WINDOW: usize = 1024;
const MARKER: &[u8] = br#""applist""#;

/// 先頭付近に `"applist"` キーがあるかの簡易チェック
pub fn has_catalog_marker(content: &[u8]) -> bool {
    let head = &content[..content.len().min(MARKER_WINDOW)];
    head.windows(MARKER.len()).any(|w| w == MARKER)
}

/// ペイロードから (appid, name) を抽出してカタログを構築
///
/// appidが数字列でないもの、trim後のnameが空のものは捨てる。
/// 同じappidが複数回現れた場合は後勝ち。
pub fn parse_catalog(content: &str) -> serde_json::Result<Catalog> {
    let root: Value = serde_json::from_str(content)?;

    let mut raw = Vec::new();
    collect_entries(&root, &mut raw);

    let total = raw.len();
    let catalog: Catalog = raw
        .into_iter()
        .filter_map(|(app_id, name)| {
            let name = name.trim();
            if is_valid_identifier(&app_id) && !name.is_empty() {
                Some((app_id, sanitize(name)))
            } else {
                None
            }
        })
        .collect();

    log::debug!(
        "catalog parsed: {} candidate entries, {} kept",
        total,
        catalog.len()
    );
    Ok(catalog)
}

fn collect_entries<'a>(value: &'a Value, out: &mut Vec<(String, &'a str)>) {
    match value {
        Value::Object(map) => {
            if let (Some(app_id), Some(Value::String(name))) = (map.get("appid"), map.get("name")) {
                if let Some(app_id) = app_id_text(app_id) {
                    out.push((app_id, name.as_str()));
                }
                return;
            }
            for child in map.values() {
                collect_entries(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_entries(item, out);
            }
        }
        _ => {}
    }
}

fn app_id_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_u64().map(|id| id.to_string()),
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}
