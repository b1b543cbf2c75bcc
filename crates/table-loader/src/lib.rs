//! Table Loader
//!
//! Turns a raw byte stream of unknown layout into a rectangular table with a
//! reliable header row and only data rows beneath it:
//! - Permissive delimited parsing (sniffed delimiter, quoted fields,
//!   malformed lines skipped)
//! - Content-based header discovery within a bounded scan window
//! - Fixed-offset header mode for loggers with a stable banner length

mod config;
mod error;
mod parser;
mod table;

pub use config::{HeaderRule, LoaderConfig, DEFAULT_HEADER_KEYWORDS, DEFAULT_SCAN_WINDOW};
pub use error::FormatError;
pub use table::{load, Table};
