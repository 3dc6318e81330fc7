//! Planar coordinates and bounding boxes.
//!
//! Network coordinates are projected (metres in a local CRS such as CH1903+),
//! so plain Euclidean geometry in `f64` is used throughout.

use serde::{Deserialize, Serialize};

/// A point in planar network units.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance.  Prefer this for comparisons.
    #[inline]
    pub fn distance_sq(self, other: Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Midpoint of the segment `self`–`other`.
    #[inline]
    pub fn midpoint(self, other: Coord) -> Coord {
        Coord::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Axis-aligned bounding box, inclusive on all sides.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Smallest box enclosing every point.  `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = BoundingBox::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        Some(bb)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Minimum corner, used as the grid origin.
    #[inline]
    pub fn origin(&self) -> Coord {
        Coord::new(self.min_x, self.min_y)
    }

    #[inline]
    pub fn contains(&self, p: Coord) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}
