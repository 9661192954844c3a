//! Exporters for merged collections and dedupe reports

mod netscape;
mod report;

pub use netscape::export_netscape_html;
pub use report::export_report_csv;

use thiserror::Error;

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}
