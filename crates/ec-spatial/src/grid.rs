//! Fixed exposure-grid geometry.
//!
//! The grid is anchored at the minimum corner of the network bounding box.
//! Cell `(i, j)` is centred on `origin + (i, j) * cell_size`; a coordinate
//! belongs to the cell whose centre is nearest on each axis, i.e.
//! `i = round((x - origin.x) / cell_size)` with halves rounding up.
//!
//! Keys outside `[0, cols) × [0, rows)` are legal: events slightly outside
//! the node bounding box still get a cell.  `cols`/`rows` only define the
//! nominal cell count used to normalise exposure.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use ec_core::{BoundingBox, Coord};

use crate::{SpatialError, SpatialResult};

/// Integer grid coordinates of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridKey {
    pub i: i64,
    pub j: i64,
}

impl GridKey {
    #[inline]
    pub const fn new(i: i64, j: i64) -> Self {
        Self { i, j }
    }
}

/// Origin, cell size and nominal extent of the exposure grid.
///
/// Immutable once constructed.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    bbox:      BoundingBox,
    cell_size: f64,
    cols:      usize,
    rows:      usize,
    cells:     usize,
}

impl GridGeometry {
    /// Lay out a grid over `bbox` with square cells of `cell_size`.
    pub fn new(bbox: BoundingBox, cell_size: f64) -> SpatialResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SpatialError::Grid(format!("cell size must be positive, got {cell_size}")));
        }
        let (w, h) = (bbox.width(), bbox.height());
        if !(w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0) {
            return Err(SpatialError::Grid(format!("degenerate bounding box {bbox:?}")));
        }
        let too_fine = || {
            SpatialError::Grid(format!("cell size {cell_size} is too fine for bounding box {bbox:?}"))
        };
        // `as` saturates, so an oversized quotient fails the `checked_add`.
        let cols = ((w / cell_size).floor() as usize).checked_add(1).ok_or_else(too_fine)?;
        let rows = ((h / cell_size).floor() as usize).checked_add(1).ok_or_else(too_fine)?;
        let cells = cols.checked_mul(rows).ok_or_else(too_fine)?;
        Ok(Self { bbox, cell_size, cols, rows, cells })
    }

    #[inline]
    pub fn origin(&self) -> Coord {
        self.bbox.origin()
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Nominal number of cells covering the bounding box (`cols * rows`).
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells
    }

    /// Key of the cell `pos` snaps to.
    #[inline]
    pub fn key_of(&self, pos: Coord) -> GridKey {
        let o = self.origin();
        GridKey::new(
            snap_axis(pos.x - o.x, self.cell_size),
            snap_axis(pos.y - o.y, self.cell_size),
        )
    }

    /// Centre of cell `key`.
    #[inline]
    pub fn center(&self, key: GridKey) -> Coord {
        let o = self.origin();
        Coord::new(
            o.x + key.i as f64 * self.cell_size,
            o.y + key.j as f64 * self.cell_size,
        )
    }

    /// `pos` moved onto the centre of its cell.
    #[inline]
    pub fn snap(&self, pos: Coord) -> Coord {
        self.center(self.key_of(pos))
    }

    /// Key ranges whose centres may fall inside the rectangle `lo..=hi`.
    ///
    /// Conservative (floor/ceil on each bound); callers filter on exact centres.
    pub fn key_ranges(&self, lo: Coord, hi: Coord) -> (RangeInclusive<i64>, RangeInclusive<i64>) {
        let o = self.origin();
        let i0 = ((lo.x - o.x) / self.cell_size).floor() as i64;
        let i1 = ((hi.x - o.x) / self.cell_size).ceil() as i64;
        let j0 = ((lo.y - o.y) / self.cell_size).floor() as i64;
        let j1 = ((hi.y - o.y) / self.cell_size).ceil() as i64;
        (i0..=i1, j0..=j1)
    }
}

/// Round-half-up, matching `floor(v + 0.5)`.
#[inline]
fn snap_axis(offset: f64, cell_size: f64) -> i64 {
    (offset / cell_size + 0.5).floor() as i64
}
