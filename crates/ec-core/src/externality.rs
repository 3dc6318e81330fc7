//! Externality event records.
//!
//! An externality is a side effect of one simulated activity: pollutant mass
//! emitted on a link, delay imposed on others, and so on.  Calculators match
//! on the variant they price and treat every other variant as free.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LinkId, PersonId};

/// Pollutant mass emitted on one link by one person.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emissions {
    /// Simulation seconds.
    pub time:       f64,
    pub link_id:    LinkId,
    pub person_id:  PersonId,
    /// Pollutant name → emitted mass.
    pub pollutants: BTreeMap<String, f64>,
}

impl Emissions {
    /// Mass of `pollutant`, or `0.0` if the event does not carry it.
    #[inline]
    pub fn mass(&self, pollutant: &str) -> f64 {
        self.pollutants.get(pollutant).copied().unwrap_or(0.0)
    }
}

/// Delay a person caused to others while on a link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Congestion {
    pub time:       f64,
    pub link_id:    LinkId,
    pub person_id:  PersonId,
    pub delay_secs: f64,
}

/// Tagged externality record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Externality {
    Emissions(Emissions),
    Congestion(Congestion),
}

/// Variant tag of an [`Externality`], used to route events to calculators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalityKind {
    Emissions,
    Congestion,
}

impl ExternalityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExternalityKind::Emissions  => "emissions",
            ExternalityKind::Congestion => "congestion",
        }
    }
}

impl fmt::Display for ExternalityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Externality {
    pub fn kind(&self) -> ExternalityKind {
        match self {
            Externality::Emissions(_)  => ExternalityKind::Emissions,
            Externality::Congestion(_) => ExternalityKind::Congestion,
        }
    }

    pub fn time(&self) -> f64 {
        match self {
            Externality::Emissions(e)  => e.time,
            Externality::Congestion(c) => c.time,
        }
    }

    pub fn link_id(&self) -> LinkId {
        match self {
            Externality::Emissions(e)  => e.link_id,
            Externality::Congestion(c) => c.link_id,
        }
    }

    pub fn person_id(&self) -> PersonId {
        match self {
            Externality::Emissions(e)  => e.person_id,
            Externality::Congestion(c) => c.person_id,
        }
    }
}

impl From<Emissions> for Externality {
    fn from(e: Emissions) -> Self {
        Externality::Emissions(e)
    }
}

impl From<Congestion> for Externality {
    fn from(c: Congestion) -> Self {
        Externality::Congestion(c)
    }
}
