//! `ec-costs` — pricing of externality events.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                |
//! |------------------|---------------------------------------------------------|
//! | [`calculator`]   | `ExternalCostCalculator` trait                          |
//! | [`health`]       | `EmissionHealthCostCalculator`                          |
//! | [`coefficients`] | `HealthCostCoefficients` — the cost-formula constants   |
//! | [`registry`]     | `CalculatorRegistry` — kind-tag dispatch and roll-ups   |
//! | [`error`]        | `CostError`, `CostResult<T>`                            |
//!
//! Calculators are built over a fully accumulated
//! [`ExposureAggregator`](ec_exposure::ExposureAggregator); they only read it.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Scores events on Rayon's thread pool.                     |

pub mod calculator;
pub mod coefficients;
pub mod error;
pub mod health;
pub mod registry;


pub use calculator::ExternalCostCalculator;
pub use coefficients::HealthCostCoefficients;
pub use error::{CostError, CostResult};
pub use health::EmissionHealthCostCalculator;
pub use registry::CalculatorRegistry;
