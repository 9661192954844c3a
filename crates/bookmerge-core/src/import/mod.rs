//! Import parsers for browser bookmark exports

mod chrome;
mod netscape;

pub use chrome::parse_chrome_json;
pub use netscape::parse_netscape_html;

use std::path::Path;

use thiserror::Error;

use crate::domain::BookmarkSet;

/// Import error type
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid JSON in {path}: {message}")]
    Json { path: String, message: String },
}

/// Parse any number of bookmark files into one collection.
///
/// Dispatch is by extension: `.json` files are treated as Chrome
/// exports, everything else as Netscape HTML. A file that cannot be read
/// or parsed is logged and skipped; it never aborts the batch.
pub fn parse_many<P: AsRef<Path>>(paths: &[P]) -> BookmarkSet {
    let mut collection = BookmarkSet::new();

    for path in paths {
        let path = path.as_ref();
        let parsed = if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            parse_chrome_json(path)
        } else {
            parse_netscape_html(path)
        };

        match parsed {
            Ok(set) => collection.extend(set.bookmarks),
            Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
        }
    }

    collection
}
