//! Health costs of particulate-matter emissions.

use ec_core::{Externality, ExternalityKind};
use ec_exposure::{DispersionModel, ExposureAggregator};
use ec_spatial::Topology;

use crate::{CostResult, ExternalCostCalculator, HealthCostCoefficients};

/// Prices [`Externality::Emissions`] by the dose of one pollutant, scaled by
/// how exposed the emitting location was in the event's time bin.
///
/// Reads the aggregator only, so it must be built after accumulation is
/// complete: the exposure factor normalises against network-wide totals.
pub struct EmissionHealthCostCalculator<'a, T: ?Sized> {
    aggregator:   &'a ExposureAggregator,
    topology:     &'a T,
    coefficients: HealthCostCoefficients,
    kernel:       Option<&'a dyn DispersionModel>,
}

impl<'a, T> EmissionHealthCostCalculator<'a, T>
where
    T: Topology + Sync + ?Sized,
{
    pub const TYPE: &'static str = "emissions_health_costs";

    /// Fails if `coefficients` do not validate.
    pub fn new(
        aggregator:   &'a ExposureAggregator,
        topology:     &'a T,
        coefficients: HealthCostCoefficients,
    ) -> CostResult<Self> {
        coefficients.validate()?;
        Ok(Self { aggregator, topology, coefficients, kernel: None })
    }

    /// Weight neighbouring cells with `kernel` instead of summing them flat.
    pub fn with_kernel(mut self, kernel: &'a dyn DispersionModel) -> Self {
        self.kernel = Some(kernel);
        self
    }

    pub fn coefficients(&self) -> &HealthCostCoefficients {
        &self.coefficients
    }
}

impl<T> ExternalCostCalculator for EmissionHealthCostCalculator<'_, T>
where
    T: Topology + Sync + ?Sized,
{
    fn kind(&self) -> ExternalityKind {
        ExternalityKind::Emissions
    }

    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    fn calculate(&self, externality: &Externality) -> CostResult<f64> {
        let Externality::Emissions(e) = externality else {
            return Ok(0.0);
        };

        let pos = self.topology.link_coord(e.link_id)?;
        let bin = self.aggregator.bins().bin_of(e.time)?;
        let dose = e.mass(&self.coefficients.dose_pollutant);

        let factor = match self.kernel {
            Some(k) => self.aggregator.exposure_factor_weighted(pos, bin, k),
            None    => self.aggregator.exposure_factor(pos, bin),
        };
        Ok(self.coefficients.cost(factor, dose))
    }
}
