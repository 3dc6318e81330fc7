//! Distance-to-weight dispersion kernels.
//!
//! A kernel models how the influence of emitted mass spreads with distance.
//! The plain [`exposure_factor`](crate::ExposureAggregator::exposure_factor)
//! does not use one; pass a kernel to
//! [`exposure_factor_weighted`](crate::ExposureAggregator::exposure_factor_weighted)
//! for a smoothed neighbourhood sum.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{ExposureError, ExposureResult};

/// A pure function from a non-negative distance to a non-negative weight.
pub trait DispersionModel: Send + Sync {
    fn calculate(&self, distance: f64) -> f64;
}

/// Isotropic 2-D Gaussian kernel:
///
/// ```text
/// w(r) = 1 / (2π σ²) · exp(−r² / (2σ²))
/// ```
///
/// Integrates to 1 over the plane.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianDispersion {
    sigma: f64,
}

impl GaussianDispersion {
    pub fn new(sigma: f64) -> ExposureResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(ExposureError::Config(format!("sigma must be positive, got {sigma}")));
        }
        Ok(Self { sigma })
    }

    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Weight at distance zero.
    #[inline]
    pub fn peak(&self) -> f64 {
        1.0 / (2.0 * PI * self.sigma * self.sigma)
    }
}

impl DispersionModel for GaussianDispersion {
    #[inline]
    fn calculate(&self, distance: f64) -> f64 {
        let two_s2 = 2.0 * self.sigma * self.sigma;
        self.peak() * (-(distance * distance) / two_s2).exp()
    }
}

impl<F> DispersionModel for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    #[inline]
    fn calculate(&self, distance: f64) -> f64 {
        self(distance)
    }
}
