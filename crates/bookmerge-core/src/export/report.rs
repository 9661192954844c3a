//! CSV dedupe report writer

use std::path::Path;

use super::ExportError;
use crate::dedupe::DedupeReportEntry;

/// Number of folder examples included per report row
const MAX_EXAMPLE_FOLDERS: usize = 5;

/// Write the dedupe report as CSV with header
/// `canonical_url,title,count,example_folders,sources`
pub fn export_report_csv(report: &[DedupeReportEntry], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["canonical_url", "title", "count", "example_folders", "sources"])?;

    for entry in report {
        let count = entry.count.to_string();
        let example_folders = entry
            .folders
            .iter()
            .take(MAX_EXAMPLE_FOLDERS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" | ");
        let sources = entry.sources.join(" | ");

        writer.write_record([
            entry.canonical_url.as_str(),
            entry.title.as_str(),
            count.as_str(),
            example_folders.as_str(),
            sources.as_str(),
        ])?;
    }

    writer.flush().map_err(|e| ExportError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(())
}
