//! Exporter integration tests

use std::fs;

use bookmerge_core::{
    export_netscape_html, export_report_csv, Bookmark, BookmarkSet, DedupeReportEntry,
};
use chrono::DateTime;
use tempfile::tempdir;

fn filed(url: &str, title: &str, folder: &str) -> Bookmark {
    let mut bookmark = Bookmark::new(url, title);
    bookmark.folder_path = folder.to_string();
    bookmark
}

#[test]
fn netscape_export_nests_folders_with_minimal_diffs() {
    let mut set = BookmarkSet::new();
    set.add(filed("https://b.com/x", "Beta", "Merged/b.com"));
    set.add(filed("https://a.com/x", "Alpha", "Merged/a.com"));
    set.add(filed("https://root.com/x", "Root", ""));

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("merged.html");
    export_netscape_html(&set, &path).expect("export");

    let html = fs::read_to_string(&path).expect("read back");

    assert!(html.starts_with("<!DOCTYPE NETSCAPE-Bookmark-file-1>"));
    // "Merged" opens once and is shared by both children.
    assert_eq!(html.matches("<H3>Merged</H3>").count(), 1);
    let a = html.find("<H3>a.com</H3>").expect("a.com folder");
    let b = html.find("<H3>b.com</H3>").expect("b.com folder");
    assert!(a < b, "folders must be written in sorted path order");
    // The record with no folder lands under Merged, before the subfolders.
    let root = html.find("https://root.com/x").expect("root record");
    assert!(root < a);
    // Every opened list is closed: 3 folder levels plus the outer list.
    assert_eq!(html.matches("<DL><p>").count(), 4);
    assert_eq!(html.matches("</DL><p>").count(), 4);
}

#[test]
fn netscape_export_sorts_records_and_escapes_markup() {
    let mut set = BookmarkSet::new();
    let mut second = filed("https://example.com/b?x=1&y=2", "zeta <tag>", "Links");
    second.added = DateTime::from_timestamp(1_700_000_000, 0);
    set.add(second);
    set.add(filed("https://example.com/a", "Alpha", "Links"));

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("merged.html");
    export_netscape_html(&set, &path).expect("export");

    let html = fs::read_to_string(&path).expect("read back");

    let alpha = html.find(">Alpha</A>").expect("alpha record");
    let zeta = html.find("zeta &lt;tag&gt;</A>").expect("escaped zeta record");
    assert!(alpha < zeta, "records sort by case-insensitive title");
    assert!(html.contains("HREF=\"https://example.com/b?x=1&amp;y=2\""));
    assert!(html.contains("ADD_DATE=\"1700000000\""));
}

fn entry(
    url: &str,
    title: &str,
    count: usize,
    folders: &[&str],
    sources: &[&str],
) -> DedupeReportEntry {
    DedupeReportEntry {
        canonical_url: url.to_string(),
        title: title.to_string(),
        count,
        folders: folders.iter().map(|s| s.to_string()).collect(),
        sources: sources.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn csv_report_writes_header_and_truncates_folders_to_five() {
    let report = vec![entry(
        "https://example.com/page",
        "Example",
        8,
        &["f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8"],
        &["one.html", "two.json"],
    )];

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("report.csv");
    export_report_csv(&report, &path).expect("export");

    let csv = fs::read_to_string(&path).expect("read back");
    let mut lines = csv.lines();

    assert_eq!(
        lines.next(),
        Some("canonical_url,title,count,example_folders,sources")
    );
    assert_eq!(
        lines.next(),
        Some("https://example.com/page,Example,8,f1 | f2 | f3 | f4 | f5,one.html | two.json")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn csv_report_quotes_fields_with_commas() {
    let report = vec![entry(
        "https://example.com/q",
        "Hello, world",
        1,
        &[],
        &[],
    )];

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("report.csv");
    export_report_csv(&report, &path).expect("export");

    let csv = fs::read_to_string(&path).expect("read back");
    assert!(csv.contains("\"Hello, world\""));
}
