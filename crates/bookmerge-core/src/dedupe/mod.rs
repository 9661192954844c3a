//! Deduplication engine
//!
//! Groups annotated bookmarks by their grouping key, optionally absorbs
//! same-domain groups with similar titles, and builds the dedupe report.

mod similarity;

pub use similarity::{SimilarityUnavailable, TitleSimilarity, WindowedLevenshtein};

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::domain::{Bookmark, BookmarkSet};
use crate::normalize::domain_of;

/// Tuning knobs for the deduplication engine
#[derive(Debug, Clone)]
pub struct DedupeConfig {
    /// Minimum partial-ratio score (0-100) for two groups to merge
    pub similarity_threshold: u8,
    /// Whether to run the domain-scoped fuzzy pass at all
    pub enable_fuzzy: bool,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 85,
            enable_fuzzy: true,
        }
    }
}

/// One group of records sharing a grouping key, plus any absorbed fuzzy
/// matches appended behind them
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Grouping key: canonical URL, or raw URL if none was derived
    pub key: String,
    /// Member records in first-seen order
    pub records: Vec<Bookmark>,
}

/// One row of the deduplication report
#[derive(Debug, Clone, Serialize)]
pub struct DedupeReportEntry {
    pub canonical_url: String,
    /// Title of the group's first record
    pub title: String,
    /// Number of records in the group
    pub count: usize,
    /// Sorted distinct non-empty folder paths across the group
    pub folders: Vec<String>,
    /// Sorted distinct non-empty source files across the group
    pub sources: Vec<String>,
}

/// Group duplicate bookmarks by grouping key, with an optional fuzzy
/// title pass scoped to each domain.
///
/// Records are expected to be annotated already; a record whose
/// `canonical_url` is empty groups under its raw `url`. Returns the
/// surviving groups in first-encountered key order together with the
/// report, sorted by count descending then case-insensitive title
/// ascending. Group order and report order are independent.
pub fn group_duplicates(
    set: &BookmarkSet,
    config: &DedupeConfig,
    similarity: &dyn TitleSimilarity,
) -> (Vec<DuplicateGroup>, Vec<DedupeReportEntry>) {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for bookmark in set.iter() {
        let key = bookmark.grouping_key();
        match index.get(key) {
            Some(&i) => groups[i].records.push(bookmark.clone()),
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(DuplicateGroup {
                    key: key.to_string(),
                    records: vec![bookmark.clone()],
                });
            }
        }
    }

    if config.enable_fuzzy && similarity.is_available() {
        fuzzy_merge(&mut groups, config, similarity);
    }

    let report = build_report(&groups);
    let groups: Vec<DuplicateGroup> = groups
        .into_iter()
        .filter(|group| !group.records.is_empty())
        .collect();

    tracing::debug!(
        "{} records grouped into {} unique keys",
        set.len(),
        groups.len()
    );

    (groups, report)
}

/// One-directional absorption of same-domain groups by title similarity.
///
/// Groups are compared pairwise in encountered order (i < j, each pair
/// once). A consumed group keeps no records and is never compared again,
/// and groups on different domains never merge. Absorption is not
/// transitive: a group consumed by an earlier one is not re-offered to
/// later groups, even if its title would have matched them.
fn fuzzy_merge(
    groups: &mut [DuplicateGroup],
    config: &DedupeConfig,
    similarity: &dyn TitleSimilarity,
) {
    let mut by_domain: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, group) in groups.iter().enumerate() {
        by_domain.entry(domain_of(&group.key)).or_default().push(i);
    }

    let threshold = f64::from(config.similarity_threshold);
    for members in by_domain.values() {
        // Representative titles are fixed for the whole pass: absorption
        // appends to the tail, so a group's first record never changes.
        let titles: Vec<String> = members
            .iter()
            .map(|&i| groups[i].records[0].title.to_lowercase())
            .collect();

        for a in 0..members.len() {
            if groups[members[a]].records.is_empty() {
                continue;
            }
            for b in (a + 1)..members.len() {
                if groups[members[b]].records.is_empty() {
                    continue;
                }
                if similarity.partial_ratio(&titles[a], &titles[b]) >= threshold {
                    let absorbed = std::mem::take(&mut groups[members[b]].records);
                    groups[members[a]].records.extend(absorbed);
                }
            }
        }
    }
}

/// Build report rows for every surviving group
fn build_report(groups: &[DuplicateGroup]) -> Vec<DedupeReportEntry> {
    let mut report: Vec<DedupeReportEntry> = groups
        .iter()
        .filter(|group| !group.records.is_empty())
        .map(|group| {
            let folders: BTreeSet<&str> = group
                .records
                .iter()
                .filter(|b| !b.folder_path.is_empty())
                .map(|b| b.folder_path.as_str())
                .collect();
            let sources: BTreeSet<&str> = group
                .records
                .iter()
                .filter(|b| !b.source_file.is_empty())
                .map(|b| b.source_file.as_str())
                .collect();

            DedupeReportEntry {
                canonical_url: group.key.clone(),
                title: group.records[0].title.clone(),
                count: group.records.len(),
                folders: folders.into_iter().map(String::from).collect(),
                sources: sources.into_iter().map(String::from).collect(),
            }
        })
        .collect();

    report.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });

    report
}
