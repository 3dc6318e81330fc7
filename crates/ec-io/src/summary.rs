//! Per-person pollutant totals.

use std::collections::BTreeMap;

use ec_core::{Emissions, Externality, PersonId};

/// Emitted mass per person and pollutant, summed over events.
///
/// Keyed by `BTreeMap` so reports come out sorted by person id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmissionsSummary {
    per_person: BTreeMap<PersonId, BTreeMap<String, f64>>,
}

impl EmissionsSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarise every emissions event in `events`; other variants are skipped.
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Externality>,
    {
        let mut summary = Self::new();
        for event in events {
            if let Externality::Emissions(e) = event {
                summary.add(e);
            }
        }
        summary
    }

    pub fn add(&mut self, event: &Emissions) {
        let entry = self.per_person.entry(event.person_id).or_default();
        for (pollutant, &mass) in &event.pollutants {
            *entry.entry(pollutant.clone()).or_insert(0.0) += mass;
        }
    }

    pub fn person_count(&self) -> usize {
        self.per_person.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_person.is_empty()
    }

    /// Total mass of `pollutant` for `person`; `0.0` when never emitted.
    pub fn get(&self, person: PersonId, pollutant: &str) -> f64 {
        self.per_person
            .get(&person)
            .and_then(|m| m.get(pollutant))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonId, &BTreeMap<String, f64>)> + '_ {
        self.per_person.iter().map(|(&p, m)| (p, m))
    }
}

impl From<BTreeMap<PersonId, BTreeMap<String, f64>>> for EmissionsSummary {
    fn from(per_person: BTreeMap<PersonId, BTreeMap<String, f64>>) -> Self {
        Self { per_person }
    }
}
