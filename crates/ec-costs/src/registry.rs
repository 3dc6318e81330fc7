//! Dispatch of externality events to the calculators that price them.
//!
//! Each calculator registers for the single [`ExternalityKind`] it reports.
//! An event is routed by its kind tag through a lookup table; no calculator
//! ever sees a variant it does not handle, and a kind without calculators
//! costs `0.0`.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use ec_core::{Externality, ExternalityKind, PersonId};

use crate::{CostError, CostResult, ExternalCostCalculator};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A set of calculators keyed by the externality kind they price.
#[derive(Default)]
pub struct CalculatorRegistry<'a> {
    calculators: Vec<Box<dyn ExternalCostCalculator + 'a>>,
    by_kind:     FxHashMap<ExternalityKind, Vec<usize>>,
}

impl<'a> CalculatorRegistry<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a calculator.  Type tags must be unique.
    pub fn register<C>(&mut self, calculator: C) -> CostResult<()>
    where
        C: ExternalCostCalculator + 'a,
    {
        let tag = calculator.type_tag();
        if self.calculators.iter().any(|c| c.type_tag() == tag) {
            return Err(CostError::Config(format!("calculator {tag:?} registered twice")));
        }
        let kind = calculator.kind();
        self.by_kind.entry(kind).or_default().push(self.calculators.len());
        self.calculators.push(Box::new(calculator));
        tracing::debug!(tag, %kind, "registered cost calculator");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    /// Type tags in registration order.
    pub fn type_tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.calculators.iter().map(|c| c.type_tag())
    }

    fn handlers(&self, kind: ExternalityKind) -> impl Iterator<Item = &(dyn ExternalCostCalculator + 'a)> + '_ {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&i| self.calculators[i].as_ref())
    }

    /// Total cost of one event over every calculator for its kind.
    pub fn calculate(&self, externality: &Externality) -> CostResult<f64> {
        let mut total = 0.0;
        for calc in self.handlers(externality.kind()) {
            total += calc.calculate(externality)?;
        }
        Ok(total)
    }

    /// Cost of one event per calculator type tag.  Empty when no calculator
    /// handles the event's kind.
    pub fn calculate_by_type(&self, externality: &Externality) -> CostResult<Vec<(&'static str, f64)>> {
        self.handlers(externality.kind())
            .map(|c| Ok((c.type_tag(), c.calculate(externality)?)))
            .collect()
    }

    /// Sum of costs per person over `events`.
    ///
    /// Persons whose events are all unpriced still appear, with `0.0`.
    /// Costs are summed in event order, so the result does not depend on
    /// whether scoring ran in parallel.
    pub fn costs_per_person(&self, events: &[Externality]) -> CostResult<BTreeMap<PersonId, f64>> {
        let scored = self.score_all(events)?;
        let mut per_person = BTreeMap::new();
        for (event, cost) in events.iter().zip(scored) {
            *per_person.entry(event.person_id()).or_insert(0.0) += cost;
        }
        tracing::info!(
            events = events.len(),
            persons = per_person.len(),
            "scored externality events"
        );
        Ok(per_person)
    }

    /// Sum of costs per calculator type tag over `events`.
    pub fn costs_per_type(&self, events: &[Externality]) -> CostResult<BTreeMap<&'static str, f64>> {
        let mut per_type: BTreeMap<&'static str, f64> =
            self.type_tags().map(|t| (t, 0.0)).collect();
        for event in events {
            for (tag, cost) in self.calculate_by_type(event)? {
                *per_type.entry(tag).or_insert(0.0) += cost;
            }
        }
        Ok(per_type)
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all(&self, events: &[Externality]) -> CostResult<Vec<f64>> {
        events.iter().map(|e| self.calculate(e)).collect()
    }

    #[cfg(feature = "parallel")]
    fn score_all(&self, events: &[Externality]) -> CostResult<Vec<f64>> {
        events.par_iter().map(|e| self.calculate(e)).collect()
    }
}
