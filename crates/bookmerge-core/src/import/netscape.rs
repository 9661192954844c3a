//! Netscape bookmark HTML parser
//!
//! Browser "export bookmarks" files are definition lists: an `<h3>`
//! names a folder and the `<dl>` that follows it holds the folder's
//! entries. Real exports rarely close their `<dt>` tags, so folder
//! lookup works on the tree as the HTML parser fixes it up.

use std::fs;
use std::path::Path;

use chrono::DateTime;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use super::ImportError;
use crate::domain::{Bookmark, BookmarkSet};
use crate::normalize::normalize_whitespace;

lazy_static! {
    static ref LINK_SELECTOR: Selector = Selector::parse("a[href]").unwrap();
    static ref H3_SELECTOR: Selector = Selector::parse("h3").unwrap();
}

/// Parse a Netscape bookmark HTML export
pub fn parse_netscape_html(path: &Path) -> Result<BookmarkSet, ImportError> {
    let content = fs::read_to_string(path).map_err(|e| ImportError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let source = path.display().to_string();
    let document = Html::parse_document(&content);
    let mut collection = BookmarkSet::new();

    for link in document.select(&LINK_SELECTOR) {
        let url = link.value().attr("href").unwrap_or("").trim();
        if url.is_empty() || url.starts_with("data:") {
            continue;
        }

        let mut title = normalize_whitespace(&link.text().collect::<String>());
        if title.is_empty() {
            title = url.to_string();
        }

        // ADD_DATE is Unix epoch seconds; anything unparsable means no date.
        let added = link
            .value()
            .attr("add_date")
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        let mut bookmark = Bookmark::new(url, title);
        bookmark.added = added;
        bookmark.folder_path = folder_path_for(link);
        bookmark.source_file = source.clone();
        collection.add(bookmark);
    }

    Ok(collection)
}

/// Folder path of a link: the headings of every ancestor `<dl>`, from
/// the outermost down, joined with `/`
fn folder_path_for(link: ElementRef<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();

    for ancestor in link.ancestors() {
        let Some(element) = ElementRef::wrap(ancestor) else {
            continue;
        };
        if element.value().name() != "dl" {
            continue;
        }
        if let Some(name) = heading_for(element) {
            parts.push(name);
        }
    }

    parts.reverse();
    parts.join("/")
}

/// The `<h3>` labeling a `<dl>`: either a preceding sibling of the list
/// itself (unclosed `<dt>`, so the list nests inside it), or inside a
/// preceding `<dt>` when the export does close its tags
fn heading_for(dl: ElementRef<'_>) -> Option<String> {
    for sibling in dl.prev_siblings() {
        let Some(element) = ElementRef::wrap(sibling) else {
            continue;
        };
        match element.value().name() {
            "h3" => {
                return Some(normalize_whitespace(&element.text().collect::<String>()));
            }
            "dt" => {
                if let Some(h3) = element.select(&H3_SELECTOR).next() {
                    return Some(normalize_whitespace(&h3.text().collect::<String>()));
                }
            }
            _ => {}
        }
    }
    None
}
