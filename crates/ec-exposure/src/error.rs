//! Exposure-subsystem error type.

use thiserror::Error;

use ec_core::{CoreError, Coord};
use ec_spatial::SpatialError;

/// Errors produced by `ec-exposure`.
#[derive(Debug, Error)]
pub enum ExposureError {
    #[error("time bin {bin} out of range (aggregator has {count} bins)")]
    BinOutOfRange { bin: usize, count: usize },

    #[error("no registered exposure cell at {0}")]
    Unregistered(Coord),

    #[error("exposure index has no cells")]
    NoCells,

    #[error("exposure amount {0} is not finite")]
    NonFiniteAmount(f64),

    #[error("exposure configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ExposureResult<T> = Result<T, ExposureError>;
