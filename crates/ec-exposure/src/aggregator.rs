//! Spatial-temporal exposure accumulator.
//!
//! # Phases
//!
//! ```text
//! ① Register   — optional: pre-create cells (e.g. one per network link).
//! ② Accumulate — add emitted mass to (cell, bin); update the per-bin total.
//! ③ Query      — exposure_factor reads cells and the per-bin totals.
//! ```
//!
//! ③ normalises against network-wide totals, so it is only meaningful once
//! ② has seen every event.  Query methods take `&self` and ingestion takes
//! `&mut self`, which lets the borrow checker enforce the ordering within a
//! single owner.
//!
//! # Invariant
//!
//! For every bin `b`, `totals[b]` equals the sum of `cell.exposure()[b]`
//! over all cells.  Both sides are only ever updated together, and neither
//! is reachable for mutation from outside this crate.

use ec_core::{BoundingBox, Coord, Externality, TimeBins};
use ec_spatial::{GridGeometry, Network, Topology};

use crate::{
    CellId, DispersionModel, ExposureConfig, ExposureError, ExposureResult, RegistrationPolicy,
    SpatialIndex,
};

/// Owns the exposure grid and the per-bin totals used for normalisation.
pub struct ExposureAggregator {
    pub(crate) index:  SpatialIndex,
    pub(crate) totals: Vec<f64>,
    bins:              TimeBins,
    exposure_distance: f64,
    registration:      RegistrationPolicy,
}

impl ExposureAggregator {
    /// Lay out an empty grid over `bbox`.
    pub fn new(bbox: BoundingBox, config: &ExposureConfig) -> ExposureResult<Self> {
        let bins = config.validate()?;
        let grid = GridGeometry::new(bbox, config.cell_size)?;
        tracing::debug!(
            cols = grid.cols(),
            rows = grid.rows(),
            cell_size = config.cell_size,
            bins = bins.count(),
            "exposure grid laid out"
        );
        Ok(Self {
            index: SpatialIndex::new(grid, bins.count()),
            totals: vec![0.0; bins.count()],
            bins,
            exposure_distance: config.exposure_distance,
            registration: config.registration,
        })
    }

    /// Lay out the grid over the node bounding box of `network`.
    pub fn for_network(network: &Network, config: &ExposureConfig) -> ExposureResult<Self> {
        let bbox = network
            .bounding_box()
            .ok_or_else(|| ExposureError::Config("network has no nodes".into()))?;
        Self::new(bbox, config)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    #[inline]
    pub fn grid(&self) -> &GridGeometry {
        self.index.grid()
    }

    #[inline]
    pub fn bins(&self) -> TimeBins {
        self.bins
    }

    #[inline]
    pub fn exposure_distance(&self) -> f64 {
        self.exposure_distance
    }

    #[inline]
    pub fn registration(&self) -> RegistrationPolicy {
        self.registration
    }

    /// Nominal cell count of the grid (`cols * rows`), not the number of
    /// registered cells.
    #[inline]
    pub fn no_cells(&self) -> usize {
        self.index.grid().cell_count()
    }

    /// Accumulated mass per bin over all cells.
    #[inline]
    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    #[inline]
    pub fn total(&self, bin: usize) -> f64 {
        self.totals.get(bin).copied().unwrap_or(0.0)
    }

    /// Network-wide mean exposure per nominal cell in `bin`.
    #[inline]
    pub fn average_exposure(&self, bin: usize) -> f64 {
        self.total(bin) / self.no_cells() as f64
    }

    // ── Registration ──────────────────────────────────────────────────────

    /// Create the cell `pos` snaps to if needed.  Never resets existing data.
    #[inline]
    pub fn register(&mut self, pos: Coord) -> CellId {
        self.index.register(pos)
    }

    /// Register the cell under every link of `network`.  Returns the number
    /// of registered cells afterwards.
    pub fn register_network(&mut self, network: &Network) -> usize {
        for link in network.links() {
            self.index.register(link.coord);
        }
        tracing::debug!(
            links = network.link_count(),
            cells = self.index.len(),
            "pre-populated exposure grid"
        );
        self.index.len()
    }

    /// Is there a registered cell within the cell-sized square around `pos`?
    pub fn is_covered(&self, pos: Coord) -> bool {
        self.index.contains_any(pos, self.grid().cell_size())
    }

    // ── Accumulation ──────────────────────────────────────────────────────

    /// Add `amount` to the cell covering `pos` in `bin`, and to the bin total.
    ///
    /// Which cell receives the mass depends on the [`RegistrationPolicy`].
    pub fn accumulate(&mut self, pos: Coord, bin: usize, amount: f64) -> ExposureResult<CellId> {
        self.check_sample(bin, amount)?;
        let id = self.resolve_cell(pos)?;
        self.index.cell_mut(id).add(bin, amount);
        self.totals[bin] += amount;
        Ok(id)
    }

    /// Accumulate the `pollutant` mass of an emissions event at its link.
    ///
    /// Returns `Ok(false)` for variants that carry no emissions.
    pub fn ingest<T>(&mut self, event: &Externality, topology: &T, pollutant: &str) -> ExposureResult<bool>
    where
        T: Topology + ?Sized,
    {
        let Externality::Emissions(e) = event else {
            return Ok(false);
        };
        let pos = topology.link_coord(e.link_id)?;
        let bin = self.bins.bin_of(e.time)?;
        self.accumulate(pos, bin, e.mass(pollutant))?;
        Ok(true)
    }

    pub(crate) fn check_sample(&self, bin: usize, amount: f64) -> ExposureResult<()> {
        if bin >= self.totals.len() {
            return Err(ExposureError::BinOutOfRange { bin, count: self.totals.len() });
        }
        if !amount.is_finite() {
            return Err(ExposureError::NonFiniteAmount(amount));
        }
        Ok(())
    }

    pub(crate) fn resolve_cell(&mut self, pos: Coord) -> ExposureResult<CellId> {
        match self.registration {
            RegistrationPolicy::AutoRegister => Ok(self.index.register(pos)),
            RegistrationPolicy::Strict => {
                self.index.cell_at(pos).ok_or(ExposureError::Unregistered(pos))
            }
            RegistrationPolicy::NearestExisting => {
                self.index.nearest(pos).ok_or(ExposureError::NoCells)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Exposure within `exposure_distance` of `pos` relative to the
    /// network-wide per-cell average for `bin`.
    ///
    /// Returns `0.0` when nothing was recorded anywhere in `bin` (or `bin`
    /// is out of range).  The ratio is not capped and not divided by the
    /// number of neighbouring cells: a crowded neighbourhood scores higher.
    pub fn exposure_factor(&self, pos: Coord, bin: usize) -> f64 {
        self.weighted_factor(pos, bin, |_| 1.0)
    }

    /// Like [`exposure_factor`](Self::exposure_factor), but each neighbouring
    /// cell is weighted by `kernel` at its distance from `pos`.
    pub fn exposure_factor_weighted<K>(&self, pos: Coord, bin: usize, kernel: &K) -> f64
    where
        K: DispersionModel + ?Sized,
    {
        self.weighted_factor(pos, bin, |d| kernel.calculate(d))
    }

    fn weighted_factor<W>(&self, pos: Coord, bin: usize, weight: W) -> f64
    where
        W: Fn(f64) -> f64,
    {
        let average = self.average_exposure(bin);
        if average == 0.0 {
            return 0.0;
        }
        let sum: f64 = self
            .index
            .disk(pos, self.exposure_distance)
            .into_iter()
            .map(|id| {
                let cell = self.index.cell(id);
                weight(cell.coord().distance(pos)) * cell.exposure_at(bin)
            })
            .sum();
        sum / average
    }
}
