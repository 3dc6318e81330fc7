//! `ec-io` — input loaders and report writers.
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `load_network_csv` — node and link files → `Network`        |
//! | [`events`]  | `load_events_csv` — emission events                         |
//! | [`summary`] | `EmissionsSummary` — per-person pollutant totals            |
//! | [`report`]  | `EmissionsPerPersonWriter`, `write_person_costs`            |
//! | [`error`]   | `IoError`, `IoResult<T>`                                    |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ec_io::{EmissionsPerPersonWriter, EmissionsSummary, load_events_csv};
//!
//! let events = load_events_csv(Path::new("emissions.csv"))?;
//! let summary = EmissionsSummary::from_events(&events);
//! EmissionsPerPersonWriter::new(&summary).write(Path::new("emissions_per_person.csv"))?;
//! ```

pub mod error;
pub mod events;
pub mod network;
pub mod report;
pub mod summary;


pub use error::{IoError, IoResult};
pub use events::{load_events_csv, load_events_reader};
pub use network::{load_network_csv, load_network_readers};
pub use report::{EmissionsPerPersonWriter, write_person_costs};
pub use summary::EmissionsSummary;
