//! Surveillance loading error types
//!
//! Every failure the normalizer can hit. At the `load_or_fallback` boundary
//! these are folded into the placeholder dataset and kept as its reason.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while normalizing a surveillance CSV
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither UTF-8 nor CP949 decoded the bytes cleanly
    #[error("Encoding error: input is neither valid UTF-8 nor CP949")]
    Encoding,

    /// Malformed CSV syntax
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No month header on row 0 or row 1
    #[error("Header not found: no row among the first two carries month columns")]
    MissingHeader,

    /// A data row is narrower than the expected layout
    #[error("Column count mismatch on line {line}: expected at least {expected}, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The reporting year cannot form calendar dates
    #[error("Invalid reporting year: {0}")]
    InvalidYear(i32),

    /// Parsing succeeded but produced no records
    #[error("No surveillance records found")]
    Empty,
}

/// Result type alias for loading operations
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::ColumnCount {
            line: 4,
            expected: 15,
            found: 9,
        };
        assert_eq!(
            err.to_string(),
            "Column count mismatch on line 4: expected at least 15, found 9"
        );

        assert_eq!(LoadError::Empty.to_string(), "No surveillance records found");
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = LoadError::Io {
            path: PathBuf::from("missing.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.csv"));
    }
}
