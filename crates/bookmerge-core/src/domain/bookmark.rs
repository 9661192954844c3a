//! Bookmark domain model

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single saved link from a browser export
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bookmark {
    /// Original URL as written in the export
    pub url: String,
    /// Display title; whitespace-normalized by the annotation pass
    pub title: String,
    /// When the bookmark was added, if the export carried a usable date
    pub added: Option<DateTime<Utc>>,
    /// Slash-separated folder path; empty means root
    pub folder_path: String,
    /// Identifier of the file this record came from
    pub source_file: String,
    /// Canonical comparison form of `url`; empty until annotated
    pub canonical_url: String,
    /// Open metadata, e.g. `original_count` on merged records
    pub meta: HashMap<String, serde_json::Value>,
}

impl Bookmark {
    /// Create a bookmark with required fields
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            added: None,
            folder_path: String::new(),
            source_file: String::new(),
            canonical_url: String::new(),
            meta: HashMap::new(),
        }
    }

    /// The key this record groups under: the canonical URL, or the raw
    /// URL while canonicalization has not produced one.
    pub fn grouping_key(&self) -> &str {
        if self.canonical_url.is_empty() {
            &self.url
        } else {
            &self.canonical_url
        }
    }
}

// Identity is (grouping key, title). Only meaningful once the record has
// been annotated with its canonical URL; the merge resolver annotates
// before any equality is evaluated.
impl PartialEq for Bookmark {
    fn eq(&self, other: &Self) -> bool {
        self.grouping_key() == other.grouping_key() && self.title == other.title
    }
}

impl Eq for Bookmark {}

impl Hash for Bookmark {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.grouping_key().hash(state);
        self.title.hash(state);
    }
}

/// Ordered collection of bookmarks plus the distinct source files seen
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookmarkSet {
    pub bookmarks: Vec<Bookmark>,
    /// Distinct non-empty source files, in order of first occurrence
    pub source_files: Vec<String>,
}

impl BookmarkSet {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bookmark. Duplicates are kept; resolution happens later
    /// in the deduplication engine.
    pub fn add(&mut self, bookmark: Bookmark) {
        if !bookmark.source_file.is_empty() && !self.source_files.contains(&bookmark.source_file) {
            self.source_files.push(bookmark.source_file.clone());
        }
        self.bookmarks.push(bookmark);
    }

    /// Append multiple bookmarks
    pub fn extend(&mut self, bookmarks: impl IntoIterator<Item = Bookmark>) {
        for bookmark in bookmarks {
            self.add(bookmark);
        }
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bookmark> {
        self.bookmarks.iter()
    }
}

impl<'a> IntoIterator for &'a BookmarkSet {
    type Item = &'a Bookmark;
    type IntoIter = std::slice::Iter<'a, Bookmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.bookmarks.iter()
    }
}
