//! Aggregator configuration.

use serde::{Deserialize, Serialize};

use ec_core::TimeBins;

use crate::{ExposureError, ExposureResult};

/// What `accumulate` does when no cell exists at the snapped position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// Create the cell on demand.  Ingestion is order-independent and needs
    /// no pre-population pass.
    #[default]
    AutoRegister,
    /// Fail with [`ExposureError::Unregistered`].
    Strict,
    /// Attribute the mass to the nearest existing cell, however far away.
    /// Only useful to reproduce results of runs that pre-populated the grid.
    NearestExisting,
}

/// Grid, time-bin and query settings of an [`ExposureAggregator`](crate::ExposureAggregator).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureConfig {
    /// Edge length of a grid cell, in network units.
    pub cell_size:         f64,
    /// Seconds per time bin.
    pub time_bin_size:     u32,
    /// Number of time bins; later events fall into the last bin.
    pub no_time_bins:      usize,
    /// Radius of the neighbourhood summed by `exposure_factor`.
    pub exposure_distance: f64,
    pub registration:      RegistrationPolicy,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            cell_size:         100.0,
            time_bin_size:     3_600,
            no_time_bins:      30,
            exposure_distance: 200.0,
            registration:      RegistrationPolicy::AutoRegister,
        }
    }
}

impl ExposureConfig {
    /// Check every field and return the time-bin layout.
    pub fn validate(&self) -> ExposureResult<TimeBins> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ExposureError::Config(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if !(self.exposure_distance.is_finite() && self.exposure_distance >= 0.0) {
            return Err(ExposureError::Config(format!(
                "exposure_distance must be >= 0, got {}",
                self.exposure_distance
            )));
        }
        Ok(TimeBins::new(self.time_bin_size, self.no_time_bins)?)
    }
}
