//! Error types for bookmerge-core

use thiserror::Error;

pub use crate::export::ExportError;
pub use crate::import::ImportError;

/// Result type alias for bookmerge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bookmerge operations
#[derive(Error, Debug)]
pub enum Error {
    /// No bookmarks survived parsing. An expected terminal state for the
    /// caller to present, not a defect.
    #[error("no bookmarks found in input files")]
    EmptyCollection,

    /// Import-related errors
    #[error("import error: {0}")]
    Import(#[from] ImportError),

    /// Export-related errors
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}
