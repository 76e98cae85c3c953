use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the loaders and the submission handler.
///
/// None of these abort the process: a calibration failure leaves the
/// [`crate::Calibration`] unavailable, an input failure becomes a message.
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("calibration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse table: {0}")]
    Csv(#[from] csv::Error),

    #[error("required columns missing. Columns: {observed:?}")]
    MissingColumns { observed: Vec<String> },

    #[error("could not parse age {text:?}")]
    InvalidInput { text: String },

    #[error("no numeric column")]
    NoNumericColumn,

    #[error("column '{column}': could not convert {value:?} to a number")]
    UploadValue { column: String, value: String },
}

/// Why a single calibration row was rejected.  Never raised to callers;
/// the loader drops the row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("row {row}: missing value in '{column}'")]
    Missing { row: usize, column: &'static str },

    #[error("row {row}: '{column}' value {value:?} is not numeric")]
    NotNumeric {
        row: usize,
        column: &'static str,
        value: String,
    },
}
