//! Error types for the pdf-repage library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pdf-repage library
///
/// Plan-building failures (`InvalidRange`, `InvalidPosition`, `InvalidSpec`)
/// are immediate and recoverable; everything else is only discoverable once
/// the documents are actually opened by the execution step.
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid page range (pages are 1-based, start must not exceed end)
    #[error("invalid page range {start}-{end}: pages are 1-based and start must not exceed end")]
    InvalidRange { start: u32, end: u32 },

    /// Insertion position below 1
    #[error("insertion position must be at least 1, got {0}")]
    InvalidPosition(u32),

    /// Unparseable page-selection or replacement expression
    #[error("invalid selection expression: {0}")]
    InvalidSpec(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Insertion position beyond the last page of the base document
    #[error("insertion position {position} is beyond the last page of {} ({page_count} pages)", .base.display())]
    ReplaceOutOfBounds {
        position: u32,
        page_count: usize,
        base: PathBuf,
    },

    /// Selected page does not exist in the source document
    #[error("page {page} is out of range for {} ({page_count} pages)", .source_path.display())]
    SourcePageOutOfRange {
        page: u32,
        page_count: usize,
        source_path: PathBuf,
    },

    /// Two replacement entries displace overlapping base pages
    #[error("replacement spans overlap in base document: pages {0}-{1} and {2}-{3}")]
    ReplaceConflict(u32, u32, u32, u32),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error
    #[error("{0}")]
    General(String),
}
