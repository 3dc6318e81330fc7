//! Cost-subsystem error type.

use thiserror::Error;

use ec_core::CoreError;
use ec_exposure::ExposureError;
use ec_spatial::SpatialError;

/// Errors produced while pricing externalities.
///
/// All of them are fatal for a run: they mean the events, the network and
/// the configuration do not belong together.
#[derive(Debug, Error)]
pub enum CostError {
    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Exposure(#[from] ExposureError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("cost configuration error: {0}")]
    Config(String),
}

pub type CostResult<T> = Result<T, CostError>;
