//! Batched accumulation.
//!
//! A batch is applied in three steps:
//!
//! 1. **Resolve** (sequential): validate every sample and map it to a
//!    `CellId`.  This may register cells, so it needs `&mut` on the index.
//! 2. **Bucket**: counting-sort the resolved samples by cell into CSR form,
//!    so the contributions of cell `c` occupy
//!    `sorted[start[c] .. start[c + 1]]` in their original order.
//! 3. **Apply**: every cell adds its own slice (one writer per cell), and
//!    per-bin totals are folded from per-worker partial sums and merged once.
//!
//! With the `parallel` feature step 3 runs on Rayon's pool.  Per-cell sums
//! are bit-identical to sequential `accumulate` calls; per-bin totals may
//! differ in the last bits because the partial sums are reassociated.
//!
//! A batch is all-or-nothing for validation: an invalid sample fails step 1
//! before any exposure is added, although cells registered by earlier
//! samples of the batch stay registered.

use ec_core::Coord;

use crate::{CellId, ExposureAggregator, ExposureResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One unit of mass to accumulate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExposureSample {
    pub coord:  Coord,
    pub bin:    usize,
    pub amount: f64,
}

impl ExposureSample {
    pub fn new(coord: Coord, bin: usize, amount: f64) -> Self {
        Self { coord, bin, amount }
    }
}

#[derive(Copy, Clone)]
struct Resolved {
    cell:   CellId,
    bin:    usize,
    amount: f64,
}

impl ExposureAggregator {
    /// Accumulate every sample of `samples`.
    ///
    /// Equivalent to calling [`accumulate`](Self::accumulate) for each
    /// sample in order, up to floating-point reassociation of the totals.
    pub fn accumulate_batch(&mut self, samples: &[ExposureSample]) -> ExposureResult<()> {
        if samples.is_empty() {
            return Ok(());
        }

        // ── ① Resolve ─────────────────────────────────────────────────────
        let mut resolved = Vec::with_capacity(samples.len());
        for s in samples {
            self.check_sample(s.bin, s.amount)?;
            let cell = self.resolve_cell(s.coord)?;
            resolved.push(Resolved { cell, bin: s.bin, amount: s.amount });
        }

        // ── ② Bucket by cell (CSR) ────────────────────────────────────────
        let cell_count = self.index.len();
        let mut start = vec![0usize; cell_count + 1];
        for r in &resolved {
            start[r.cell.index() + 1] += 1;
        }
        for i in 1..=cell_count {
            start[i] += start[i - 1];
        }
        let mut cursor = start.clone();
        let mut sorted = vec![(0usize, 0.0f64); resolved.len()];
        for r in &resolved {
            let slot = &mut cursor[r.cell.index()];
            sorted[*slot] = (r.bin, r.amount);
            *slot += 1;
        }

        // ── ③ Apply ───────────────────────────────────────────────────────
        let no_bins = self.totals.len();
        let partial = apply(self.index.cells_mut(), &start, &sorted, no_bins);
        for (total, p) in self.totals.iter_mut().zip(partial) {
            *total += p;
        }

        tracing::debug!(
            samples = samples.len(),
            cells = cell_count,
            "accumulated exposure batch"
        );
        Ok(())
    }
}

#[cfg(not(feature = "parallel"))]
fn apply(
    cells:   &mut [crate::ExposureCell],
    start:   &[usize],
    sorted:  &[(usize, f64)],
    no_bins: usize,
) -> Vec<f64> {
    let mut partial = vec![0.0; no_bins];
    for (c, cell) in cells.iter_mut().enumerate() {
        for &(bin, amount) in &sorted[start[c]..start[c + 1]] {
            cell.add(bin, amount);
            partial[bin] += amount;
        }
    }
    partial
}

#[cfg(feature = "parallel")]
fn apply(
    cells:   &mut [crate::ExposureCell],
    start:   &[usize],
    sorted:  &[(usize, f64)],
    no_bins: usize,
) -> Vec<f64> {
    cells
        .par_iter_mut()
        .enumerate()
        .fold(
            || vec![0.0; no_bins],
            |mut partial, (c, cell)| {
                for &(bin, amount) in &sorted[start[c]..start[c + 1]] {
                    cell.add(bin, amount);
                    partial[bin] += amount;
                }
                partial
            },
        )
        .reduce(
            || vec![0.0; no_bins],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        )
}
