//! Hashed-grid index of exposure cells.
//!
//! # Data layout
//!
//! Cells live in a `Vec<ExposureCell>` indexed by [`CellId`] (insertion
//! order).  Two lookup structures point into it:
//!
//! - `by_key`: `GridKey → CellId`.  Exact-cell lookup, disk and rectangle
//!   queries walk the candidate keys of the query's bounding square, or every
//!   cell when that square holds more keys than there are cells.
//! - `tree`: an R-tree over cell centres for nearest-cell queries, which have
//!   no upper bound on how far away the answer is.
//!
//! Cells are never removed, so both structures only grow.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use ec_core::Coord;
use ec_spatial::{GridGeometry, GridKey};

/// Index of a cell in insertion order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CellId(pub u32);

impl CellId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── ExposureCell ──────────────────────────────────────────────────────────────

/// One grid cell and its per-time-bin exposure histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct ExposureCell {
    key:      GridKey,
    coord:    Coord,
    exposure: Vec<f64>,
}

impl ExposureCell {
    fn new(key: GridKey, coord: Coord, no_time_bins: usize) -> Self {
        Self { key, coord, exposure: vec![0.0; no_time_bins] }
    }

    #[inline]
    pub fn key(&self) -> GridKey {
        self.key
    }

    /// Grid-aligned centre of the cell.
    #[inline]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Accumulated exposure per time bin.
    #[inline]
    pub fn exposure(&self) -> &[f64] {
        &self.exposure
    }

    #[inline]
    pub fn exposure_at(&self, bin: usize) -> f64 {
        self.exposure[bin]
    }

    /// Sum over all time bins.
    pub fn total(&self) -> f64 {
        self.exposure.iter().sum()
    }

    #[inline]
    pub(crate) fn add(&mut self, bin: usize, amount: f64) {
        self.exposure[bin] += amount;
    }
}

// ── R-tree cell entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct CellEntry {
    point: [f64; 2],
    id:    CellId,
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for CellEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Grid-aligned point index mapping snapped coordinates to exposure cells.
pub struct SpatialIndex {
    grid:         GridGeometry,
    no_time_bins: usize,
    cells:        Vec<ExposureCell>,
    by_key:       FxHashMap<GridKey, CellId>,
    tree:         RTree<CellEntry>,
}

impl SpatialIndex {
    pub fn new(grid: GridGeometry, no_time_bins: usize) -> Self {
        Self {
            grid,
            no_time_bins,
            cells: Vec::new(),
            by_key: FxHashMap::default(),
            tree: RTree::new(),
        }
    }

    #[inline]
    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    #[inline]
    pub fn no_time_bins(&self) -> usize {
        self.no_time_bins
    }

    /// Number of registered cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> &ExposureCell {
        &self.cells[id.index()]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut ExposureCell {
        &mut self.cells[id.index()]
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [ExposureCell] {
        &mut self.cells
    }

    /// All cells in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, &ExposureCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId(i as u32), c))
    }

    /// Return the cell `pos` snaps to, creating it with a zeroed histogram if
    /// absent.  An existing cell is returned untouched.
    pub fn register(&mut self, pos: Coord) -> CellId {
        let key = self.grid.key_of(pos);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }

        let id = CellId(self.cells.len() as u32);
        let center = self.grid.center(key);
        self.cells.push(ExposureCell::new(key, center, self.no_time_bins));
        self.by_key.insert(key, id);
        self.tree.insert(CellEntry { point: [center.x, center.y], id });
        tracing::trace!(i = key.i, j = key.j, cell = id.0, "registered exposure cell");
        id
    }

    /// Cell at the snapped position of `pos`, if registered.
    #[inline]
    pub fn cell_at(&self, pos: Coord) -> Option<CellId> {
        self.by_key.get(&self.grid.key_of(pos)).copied()
    }

    /// Cell whose centre is closest to `pos`.  Ties go to the lowest
    /// `CellId`, i.e. the earliest registered.
    pub fn nearest(&self, pos: Coord) -> Option<CellId> {
        let query = [pos.x, pos.y];
        let mut iter = self.tree.nearest_neighbor_iter(&query);
        let first = iter.next()?;
        let best = first.distance_2(&query);
        let tied = iter
            .take_while(|e| e.distance_2(&query) <= best)
            .map(|e| e.id)
            .min();
        Some(tied.map_or(first.id, |t| t.min(first.id)))
    }

    /// Cells whose centre lies within `radius` of `pos` (inclusive), in
    /// ascending `CellId` order.
    pub fn disk(&self, pos: Coord, radius: f64) -> Vec<CellId> {
        if radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        let r2 = radius * radius;
        let lo = Coord::new(pos.x - radius, pos.y - radius);
        let hi = Coord::new(pos.x + radius, pos.y + radius);
        self.collect_in(lo, hi, |c| c.distance_sq(pos) <= r2)
    }

    /// Cells whose centre lies in the rectangle `lo..=hi`, in ascending
    /// `CellId` order.
    pub fn rectangle(&self, lo: Coord, hi: Coord) -> Vec<CellId> {
        self.collect_in(lo, hi, |c| c.x >= lo.x && c.x <= hi.x && c.y >= lo.y && c.y <= hi.y)
    }

    /// Does any cell centre lie in the `size × size` square centred on `pos`?
    pub fn contains_any(&self, pos: Coord, size: f64) -> bool {
        let h = size * 0.5;
        !self
            .rectangle(Coord::new(pos.x - h, pos.y - h), Coord::new(pos.x + h, pos.y + h))
            .is_empty()
    }

    fn collect_in<F>(&self, lo: Coord, hi: Coord, keep: F) -> Vec<CellId>
    where
        F: Fn(Coord) -> bool,
    {
        if self.cells.is_empty() {
            return Vec::new();
        }
        let (is, js) = self.grid.key_ranges(lo, hi);
        // Widened: saturated bounds span the full `i64` range.
        let span = |r: &std::ops::RangeInclusive<i64>| {
            (i128::from(*r.end()) - i128::from(*r.start()) + 1).max(0) as u128
        };
        let candidates = span(&is).saturating_mul(span(&js));

        let mut out: Vec<CellId> = if candidates > self.cells.len() as u128 {
            self.cells()
                .filter(|(_, c)| keep(c.coord))
                .map(|(id, _)| id)
                .collect()
        } else {
            let mut hits = Vec::new();
            for i in is {
                for j in js.clone() {
                    if let Some(&id) = self.by_key.get(&GridKey::new(i, j)) {
                        if keep(self.cells[id.index()].coord) {
                            hits.push(id);
                        }
                    }
                }
            }
            hits
        };
        out.sort_unstable();
        out
    }
}
