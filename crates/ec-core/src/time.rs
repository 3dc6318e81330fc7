//! Time binning.
//!
//! Event times are simulation seconds since midnight of the first day.  The
//! horizon is cut into `count` bins of `width_secs` each; anything past the
//! horizon lands in the last bin, so late-night events of a 30-hour simulated
//! day are never dropped.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Map `time` to its bin: `floor(time / width)` clamped to `[0, count - 1]`.
///
/// Precondition: `time >= 0` and `count >= 1`.  Callers reject negative
/// times first; use [`TimeBins::bin_of`] for a checked variant.
#[inline]
pub fn bin_index(time: f64, width_secs: u32, count: usize) -> usize {
    debug_assert!(time >= 0.0, "negative event time {time}");
    debug_assert!(count > 0, "time-bin count must be positive");
    let bin = (time / f64::from(width_secs)).floor();
    // `as` saturates, so huge times still clamp below.
    (bin as usize).min(count - 1)
}

/// A fixed time-bin layout: bin width and number of bins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBins {
    width_secs: u32,
    count:      usize,
}

impl TimeBins {
    /// Build a layout, rejecting a zero width or zero count.
    pub fn new(width_secs: u32, count: usize) -> CoreResult<Self> {
        if width_secs == 0 {
            return Err(CoreError::Config("time-bin width must be positive".into()));
        }
        if count == 0 {
            return Err(CoreError::Config("time-bin count must be positive".into()));
        }
        Ok(Self { width_secs, count })
    }

    #[inline]
    pub fn width_secs(&self) -> u32 {
        self.width_secs
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Checked binning: fails on negative or non-finite times.
    pub fn bin_of(&self, time: f64) -> CoreResult<usize> {
        if !time.is_finite() || time < 0.0 {
            return Err(CoreError::InvalidTime(time));
        }
        Ok(bin_index(time, self.width_secs, self.count))
    }

    /// Start of `bin` in seconds.
    #[inline]
    pub fn bin_start_secs(&self, bin: usize) -> u64 {
        bin as u64 * u64::from(self.width_secs)
    }
}
