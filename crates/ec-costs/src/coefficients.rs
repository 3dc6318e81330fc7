//! Epidemiological and economic coefficients of the health-cost model.
//!
//! ```text
//! cost = (exposure_slope · exposure_factor + base_rate) · dose · price_scale
//! ```
//!
//! The defaults are externally derived PM rates per unit dose (`186 000e-6`
//! exposure-dependent, `260 000e-6` base) and a price-level correction of
//! `2370 / 2115` from the reference year of those rates.

use serde::{Deserialize, Serialize};

use ec_core::PM;

use crate::{CostError, CostResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCostCoefficients {
    /// Cost per unit dose per unit exposure factor (`a`).
    pub exposure_slope: f64,
    /// Exposure-independent cost per unit dose (`b`).
    pub base_rate:      f64,
    /// Price-level correction applied to the whole product.
    pub price_scale:    f64,
    /// Pollutant whose mass is the dose.
    pub dose_pollutant: String,
}

impl Default for HealthCostCoefficients {
    fn default() -> Self {
        Self {
            exposure_slope: 186_000.0 / 1e6,
            base_rate:      260_000.0 / 1e6,
            price_scale:    2_370.0 / 2_115.0,
            dose_pollutant: PM.to_owned(),
        }
    }
}

impl HealthCostCoefficients {
    pub fn validate(&self) -> CostResult<()> {
        let finite = [self.exposure_slope, self.base_rate, self.price_scale]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(CostError::Config("health-cost coefficients must be finite".into()));
        }
        if self.dose_pollutant.is_empty() {
            return Err(CostError::Config("dose pollutant must not be empty".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn cost(&self, exposure_factor: f64, dose: f64) -> f64 {
        (self.exposure_slope * exposure_factor + self.base_rate) * dose * self.price_scale
    }
}
