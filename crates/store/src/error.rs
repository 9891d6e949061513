//! Error types for the store crate.
//!
//! Only the CSV loader can fail; the in-memory store itself is infallible.
//! Errors carry enough context (file, line, field) to point at the offending
//! row in a dataset dump.

use thiserror::Error;

/// Errors that can occur while loading rating/catalog data from disk
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value (e.g. a score outside 1.0-5.0)
    #[error("Invalid value for {field} at line {line} in {file}: {value}")]
    InvalidValue {
        file: String,
        line: usize,
        field: String,
        value: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
