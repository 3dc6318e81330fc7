//! Error types for ec-io.

use thiserror::Error;

use ec_spatial::SpatialError;

/// Errors that can occur while loading inputs or writing reports.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse error at line {line}: {msg}")]
    Parse { line: u64, msg: String },

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

/// Alias for `Result<T, IoError>`.
pub type IoResult<T> = Result<T, IoError>;
