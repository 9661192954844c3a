//! Chrome/Chromium JSON bookmark parser

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::ImportError;
use crate::domain::{Bookmark, BookmarkSet};

/// Microseconds between the WebKit epoch (1601-01-01) and the Unix epoch
const WEBKIT_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600_000_000;

/// Root keys of the Chrome bookmark tree and their display names
const ROOTS: [(&str, &str); 4] = [
    ("bookmark_bar", "Bookmark Bar"),
    ("other", "Other"),
    ("synced", "Synced"),
    ("mobile", "Mobile"),
];

/// Parse a Chrome `Bookmarks` JSON export
pub fn parse_chrome_json(path: &Path) -> Result<BookmarkSet, ImportError> {
    let content = fs::read_to_string(path).map_err(|e| ImportError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let data: Value = serde_json::from_str(&content).map_err(|e| ImportError::Json {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let source = path.display().to_string();
    let mut collection = BookmarkSet::new();

    if let Some(roots) = data.get("roots") {
        for (key, display_name) in ROOTS {
            if let Some(node) = roots.get(key) {
                walk_node(node, display_name, &source, &mut collection);
            }
        }
    }

    Ok(collection)
}

fn walk_node(node: &Value, folder_path: &str, source: &str, collection: &mut BookmarkSet) {
    match node.get("type").and_then(Value::as_str) {
        Some("url") => {
            let url = node.get("url").and_then(Value::as_str).unwrap_or("").trim();
            if url.is_empty() {
                return;
            }
            let name = node
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(url);

            let mut bookmark = Bookmark::new(url, name);
            bookmark.added = node.get("date_added").and_then(parse_webkit_timestamp);
            bookmark.folder_path = folder_path.to_string();
            bookmark.source_file = source.to_string();
            collection.add(bookmark);
        }
        Some("folder") => {
            let name = node
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or("");
            let child_path = if name.is_empty() {
                folder_path.to_string()
            } else if folder_path.is_empty() {
                name.to_string()
            } else {
                format!("{folder_path}/{name}")
            };

            if let Some(children) = node.get("children").and_then(Value::as_array) {
                for child in children {
                    walk_node(child, &child_path, source, collection);
                }
            }
        }
        _ => {}
    }
}

/// Chrome timestamps are microseconds since 1601-01-01, carried as a
/// JSON string in real exports but occasionally as a number; malformed
/// values mean no date
fn parse_webkit_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    let micros = match raw {
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    DateTime::from_timestamp_micros(micros - WEBKIT_EPOCH_OFFSET_MICROS)
}
