//! `ec-exposure` — spatial-temporal exposure accumulation.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`index`]      | `SpatialIndex`, `ExposureCell`, `CellId`                   |
//! | [`aggregator`] | `ExposureAggregator` — ingestion and exposure factors      |
//! | [`batch`]      | `ExposureSample`, `accumulate_batch`                       |
//! | [`dispersion`] | `DispersionModel` trait, `GaussianDispersion`              |
//! | [`config`]     | `ExposureConfig`, `RegistrationPolicy`                     |
//! | [`error`]      | `ExposureError`, `ExposureResult<T>`                       |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Applies `accumulate_batch` on Rayon's thread pool.       |

pub mod aggregator;
pub mod batch;
pub mod config;
pub mod dispersion;
pub mod error;
pub mod index;

#[cfg(test)]
mod tests;

pub use aggregator::ExposureAggregator;
pub use batch::ExposureSample;
pub use config::{ExposureConfig, RegistrationPolicy};
pub use dispersion::{DispersionModel, GaussianDispersion};
pub use error::{ExposureError, ExposureResult};
pub use index::{CellId, ExposureCell, SpatialIndex};
