//! bookmerge - merge and deduplicate browser bookmark exports
//!
//! With input files the pipeline runs once and writes the merged HTML
//! plus a CSV dedupe report; without input files the interactive console
//! takes over.

mod tui;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use bookmerge_core::{
    export_netscape_html, export_report_csv, merge_bookmarks, parse_many, DedupeConfig, Error,
    WindowedLevenshtein,
};

#[derive(Parser, Debug)]
#[command(
    name = "bookmerge",
    version,
    about = "Merge and deduplicate browser bookmarks"
)]
struct Cli {
    /// Input bookmark files (Netscape HTML or Chrome JSON)
    #[arg(short, long, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Output HTML file path
    #[arg(short, long, default_value = "merged_bookmarks.html")]
    out: PathBuf,

    /// Similarity threshold for fuzzy matching (0-100)
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(0..=100))]
    similarity: u8,

    /// Disable fuzzy title matching
    #[arg(long)]
    no_fuzzy: bool,
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if cli.input.is_empty() {
        if let Err(e) = tui::run() {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        return;
    }

    if let Err(e) = run_batch(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_batch(cli: &Cli) -> Result<(), Error> {
    let collection = parse_many(&cli.input);
    if collection.is_empty() {
        return Err(Error::EmptyCollection);
    }
    println!(
        "Parsed {} bookmarks from {} file(s)",
        collection.len(),
        cli.input.len()
    );

    let config = DedupeConfig {
        similarity_threshold: cli.similarity,
        enable_fuzzy: !cli.no_fuzzy,
    };
    let (merged, report) = merge_bookmarks(&collection, &config, &WindowedLevenshtein);
    println!("Merged to {} unique bookmarks", merged.len());

    export_netscape_html(&merged, &cli.out)?;
    println!("Exported merged bookmarks to {}", cli.out.display());

    let report_path = report_path_for(&cli.out);
    export_report_csv(&report, &report_path)?;
    println!("Exported deduplication report to {}", report_path.display());

    Ok(())
}

/// `<stem>_dedupe_report.csv` next to the merged output
pub(crate) fn report_path_for(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("merged");
    out.with_file_name(format!("{stem}_dedupe_report.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path_sits_next_to_output() {
        let path = report_path_for(Path::new("out/merged_bookmarks.html"));
        assert_eq!(path, PathBuf::from("out/merged_bookmarks_dedupe_report.csv"));
    }
}
