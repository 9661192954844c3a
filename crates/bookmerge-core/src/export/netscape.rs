//! Netscape bookmark HTML writer
//!
//! Folders are emitted in sorted path order with a minimal-diff nested
//! definition-list structure: each folder opens and closes only the
//! levels that differ from the previously written folder path.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ExportError;
use crate::domain::{Bookmark, BookmarkSet};

/// Write a collection as a Netscape bookmark file
pub fn export_netscape_html(set: &BookmarkSet, path: &Path) -> Result<(), ExportError> {
    // Records without a folder land under "Merged" rather than the root.
    let mut folders: BTreeMap<String, Vec<&Bookmark>> = BTreeMap::new();
    for bookmark in set.iter() {
        let folder = if bookmark.folder_path.is_empty() {
            "Merged".to_string()
        } else {
            bookmark.folder_path.clone()
        };
        folders.entry(folder).or_default().push(bookmark);
    }
    for bookmarks in folders.values_mut() {
        bookmarks.sort_by_key(|b| b.title.to_lowercase());
    }

    let write_error = |e: std::io::Error| ExportError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let file = File::create(path).map_err(write_error)?;
    let mut out = BufWriter::new(file);
    write_document(&mut out, &folders).map_err(write_error)
}

fn write_document(
    out: &mut impl Write,
    folders: &BTreeMap<String, Vec<&Bookmark>>,
) -> std::io::Result<()> {
    writeln!(out, "<!DOCTYPE NETSCAPE-Bookmark-file-1>")?;
    writeln!(out, "<!-- This is an automatically generated file.")?;
    writeln!(out, "     It will be read and overwritten.")?;
    writeln!(out, "     DO NOT EDIT! -->")?;
    writeln!(
        out,
        "<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">"
    )?;
    writeln!(out, "<TITLE>Bookmarks</TITLE>")?;
    writeln!(out, "<H1>Bookmarks</H1>")?;
    writeln!(out, "<DL><p>")?;

    // Stack of folder levels currently open.
    let mut open: Vec<String> = Vec::new();

    for (folder_path, bookmarks) in folders {
        if bookmarks.is_empty() {
            continue;
        }
        let parts: Vec<&str> = folder_path.split('/').collect();

        let shared = open
            .iter()
            .zip(&parts)
            .take_while(|(have, want)| have.as_str() == **want)
            .count();

        while open.len() > shared {
            open.pop();
            writeln!(out, "{}</DL><p>", "  ".repeat(open.len()))?;
        }
        for part in &parts[shared..] {
            writeln!(
                out,
                "{}<DT><H3>{}</H3>",
                "  ".repeat(open.len()),
                escape(part)
            )?;
            writeln!(out, "{}<DL><p>", "  ".repeat(open.len()))?;
            open.push((*part).to_string());
        }

        for bookmark in bookmarks {
            let add_date = bookmark
                .added
                .map(|added| format!(" ADD_DATE=\"{}\"", added.timestamp()))
                .unwrap_or_default();
            writeln!(
                out,
                "{}<DT><A HREF=\"{}\"{}>{}</A>",
                "  ".repeat(open.len()),
                escape(&bookmark.url),
                add_date,
                escape(&bookmark.title)
            )?;
        }
    }

    while open.pop().is_some() {
        writeln!(out, "{}</DL><p>", "  ".repeat(open.len()))?;
    }
    writeln!(out, "</DL><p>")?;

    Ok(())
}

/// Minimal HTML escaping for attribute and text positions
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
