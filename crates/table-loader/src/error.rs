//! Loader error types

use thiserror::Error;

/// Errors raised while turning raw bytes into a table
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    /// No row in the scan window matched the header keywords
    #[error("no header row found in the first {scanned} rows (keywords: {keywords:?})")]
    HeaderNotFound {
        scanned: usize,
        keywords: Vec<String>,
    },

    /// Fixed-offset header row lies beyond the end of the file
    #[error("fixed header row {row} is out of range (file has {rows} parseable rows)")]
    HeaderRowOutOfRange { row: usize, rows: usize },

    /// A header was found but nothing usable lies below it
    #[error("no data rows below the header")]
    NoDataRows,

    /// The file contained no parseable rows at all
    #[error("file is empty or contains no parseable rows")]
    EmptyFile,
}
