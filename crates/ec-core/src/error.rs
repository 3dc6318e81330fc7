//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The base error type shared by all `ec-*` crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Event times must be finite and non-negative before they are binned.
    #[error("invalid event time {0}: must be finite and >= 0")]
    InvalidTime(f64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ec-core`.
pub type CoreResult<T> = Result<T, CoreError>;
