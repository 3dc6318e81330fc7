//! `ec-spatial` — network topology and grid geometry.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `Network` (links + R-tree), `NetworkBuilder`, `Topology`    |
//! | [`grid`]    | `GridGeometry`, `GridKey` — the fixed exposure grid layout  |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |

pub mod error;
pub mod grid;
pub mod network;


pub use error::{SpatialError, SpatialResult};
pub use grid::{GridGeometry, GridKey};
pub use network::{Link, Network, NetworkBuilder, Topology};
