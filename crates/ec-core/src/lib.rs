//! `ec-core` — foundational types for the external-cost framework.
//!
//! This crate is a dependency of every other `ec-*` crate.  It has no `ec-*`
//! dependencies and only `serde` and `thiserror` from the ecosystem.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `LinkId`, `PersonId`                        |
//! | [`geo`]         | `Coord`, `BoundingBox`                                |
//! | [`time`]        | `bin_index`, `TimeBins`                               |
//! | [`externality`] | `Externality`, `Emissions`, `Congestion`, kind tags   |
//! | [`pollutant`]   | Pollutant names and the report column order           |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod error;
pub mod externality;
pub mod geo;
pub mod ids;
pub mod pollutant;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use externality::{Congestion, Emissions, Externality, ExternalityKind};
pub use geo::{BoundingBox, Coord};
pub use ids::{LinkId, NodeId, PersonId};
pub use pollutant::{PM, REPORT_POLLUTANTS};
pub use time::{TimeBins, bin_index};
