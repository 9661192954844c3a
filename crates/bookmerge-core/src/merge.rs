//! Merge resolution: annotation, representative selection, and the
//! merged output collection

use std::collections::BTreeSet;

use crate::dedupe::{group_duplicates, DedupeConfig, DedupeReportEntry, TitleSimilarity};
use crate::domain::{Bookmark, BookmarkSet};
use crate::normalize::{canonicalize_url, domain_of, normalize_whitespace};

/// Annotate every record with its canonical URL and normalized title,
/// returning a new collection. The input is left untouched.
pub fn annotate(set: &BookmarkSet) -> BookmarkSet {
    let mut annotated = BookmarkSet::new();
    for bookmark in set.iter() {
        let mut record = bookmark.clone();
        record.canonical_url = canonicalize_url(&record.url);
        record.title = normalize_whitespace(&record.title);
        annotated.add(record);
    }
    annotated
}

/// Deduplicate a collection and build one merged record per group.
///
/// Runs the annotation pass, groups via the deduplication engine, and
/// selects each group's representative: the member with the earliest
/// added date, first-seen order breaking ties; a record without a date
/// is only chosen when no member has one. Merged records are filed under
/// `Merged/<domain>` when the grouping key has a host, else `Merged`,
/// and carry the group size in `meta["original_count"]`.
pub fn merge_bookmarks(
    set: &BookmarkSet,
    config: &DedupeConfig,
    similarity: &dyn TitleSimilarity,
) -> (BookmarkSet, Vec<DedupeReportEntry>) {
    let annotated = annotate(set);
    let (groups, report) = group_duplicates(&annotated, config, similarity);

    let mut merged = BookmarkSet::new();
    for group in &groups {
        let representative = select_representative(&group.records);

        let domain = domain_of(&group.key);
        let folder_path = if domain.is_empty() {
            "Merged".to_string()
        } else {
            format!("Merged/{domain}")
        };

        let sources: BTreeSet<&str> = group
            .records
            .iter()
            .filter(|b| !b.source_file.is_empty())
            .map(|b| b.source_file.as_str())
            .collect();

        let mut record = Bookmark::new(representative.url.clone(), representative.title.clone());
        record.added = representative.added;
        record.folder_path = folder_path;
        record.source_file = sources.into_iter().collect::<Vec<_>>().join(", ");
        record.canonical_url = group.key.clone();
        record.meta.insert(
            "original_count".to_string(),
            serde_json::Value::from(group.records.len()),
        );
        merged.add(record);
    }

    tracing::debug!("merged {} records down to {}", set.len(), merged.len());

    (merged, report)
}

/// Earliest-added member of a group, falling back to the first member
/// when none carries a date
fn select_representative(records: &[Bookmark]) -> &Bookmark {
    let mut representative = &records[0];
    let mut earliest = representative.added;

    for record in &records[1..] {
        if let Some(added) = record.added {
            if earliest.map_or(true, |current| added < current) {
                representative = record;
                earliest = Some(added);
            }
        }
    }

    representative
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn dated(url: &str, title: &str, secs: Option<i64>) -> Bookmark {
        let mut bookmark = Bookmark::new(url, title);
        bookmark.added = secs.and_then(|s| DateTime::from_timestamp(s, 0));
        bookmark
    }

    #[test]
    fn test_annotate_returns_new_collection() {
        let mut set = BookmarkSet::new();
        set.add(Bookmark::new("https://example.com/a#x", "  Spaced   Title "));

        let annotated = annotate(&set);

        assert_eq!(annotated.bookmarks[0].canonical_url, "https://example.com/a");
        assert_eq!(annotated.bookmarks[0].title, "Spaced Title");
        // caller's records untouched
        assert_eq!(set.bookmarks[0].canonical_url, "");
        assert_eq!(set.bookmarks[0].title, "  Spaced   Title ");
    }

    #[test]
    fn test_select_representative_prefers_earliest_date() {
        let records = vec![
            dated("https://a.com/1", "t", Some(300)),
            dated("https://a.com/1", "t", Some(100)),
            dated("https://a.com/1", "t", Some(200)),
        ];
        let representative = select_representative(&records);
        assert_eq!(representative.added, DateTime::from_timestamp(100, 0));
    }

    #[test]
    fn test_select_representative_skips_undated_when_any_dated() {
        let records = vec![
            dated("https://a.com/1", "t", None),
            dated("https://a.com/2", "t", Some(500)),
        ];
        let representative = select_representative(&records);
        assert_eq!(representative.url, "https://a.com/2");
    }

    #[test]
    fn test_select_representative_falls_back_to_first() {
        let records = vec![
            dated("https://a.com/1", "t", None),
            dated("https://a.com/2", "t", None),
        ];
        let representative = select_representative(&records);
        assert_eq!(representative.url, "https://a.com/1");
    }
}
