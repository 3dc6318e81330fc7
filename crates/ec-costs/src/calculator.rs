//! The `ExternalCostCalculator` trait — the extension point for new cost kinds.

use ec_core::{Externality, ExternalityKind};

use crate::CostResult;

/// Prices one kind of externality.
///
/// A calculator handles exactly one [`ExternalityKind`].  Handed any other
/// variant, it returns `Ok(0.0)` so heterogeneous event streams can flow
/// through one pipeline.
///
/// Calculators only read shared state, so the trait requires `Send + Sync`
/// and events may be scored in parallel.
pub trait ExternalCostCalculator: Send + Sync {
    /// The variant this calculator prices.
    fn kind(&self) -> ExternalityKind;

    /// Stable tag naming the cost category, e.g. `"emissions_health_costs"`.
    fn type_tag(&self) -> &'static str;

    /// Monetary cost of `externality`.
    fn calculate(&self, externality: &Externality) -> CostResult<f64>;
}
