use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for the analysis pipeline
// ---------------------------------------------------------------------------

/// Every failure the pipeline can surface. None of them are recovered: the
/// caller aborts the remaining steps and reports the error.
#[derive(Debug, Error)]
pub enum SstError {
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("column '{0}' not found in header")]
    ColumnNotFound(String),

    #[error("series is empty")]
    EmptySeries,

    #[error("{operation} needs {needed}, got {got}")]
    InsufficientData {
        operation: &'static str,
        needed: &'static str,
        got: String,
    },

    #[error("cadence check failed: {0}")]
    Cadence(String),

    #[error("rendering {figure}: {message}")]
    Render { figure: String, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SstError>;
