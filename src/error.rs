//! Error types for dataset loading and filter construction.
//!
//! Library code returns these typed errors via `thiserror`; the binary
//! wraps them with `anyhow` context at its edges.

use std::path::PathBuf;

/// Fatal error raised while loading the launch dataset at startup.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// One or more required columns are absent from the header row.
    #[error("missing columns in CSV: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// The file has no header row at all.
    #[error("CSV has no header row")]
    EmptyHeader,

    /// The input file could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed CSV (bad quoting, invalid UTF-8, ...).
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// A filter selection that cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("invalid payload range: low ({low}) is greater than high ({high})")]
    InvalidRange { low: f64, high: f64 },

    #[error("payload range bounds must be finite numbers")]
    NonFiniteBound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = DataLoadError::MissingColumns {
            columns: vec!["Class".to_string(), "PayloadMass".to_string()],
        };
        assert_eq!(err.to_string(), "missing columns in CSV: Class, PayloadMass");
    }

    #[test]
    fn test_invalid_range_message() {
        let err = SelectionError::InvalidRange {
            low: 900.0,
            high: 100.0,
        };
        assert!(err.to_string().contains("900"));
        assert!(err.to_string().contains("100"));
    }
}
