//! Microsecond time values and half-open time ranges.
//!
//! All scheduling happens in signed 64-bit microseconds read from a
//! [`Clock`](crate::clock::Clock). Seconds only appear at the API edge.

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// Microseconds in one second
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Convert seconds to microseconds, rounding to the nearest microsecond.
#[inline]
pub fn secs_to_micros(secs: f64) -> i64 {
    (secs * MICROS_PER_SECOND).round() as i64
}

/// Convert seconds to microseconds, rejecting NaN and infinities.
#[inline]
pub fn try_secs_to_micros(secs: f64) -> Result<i64, ScriptError> {
    if !secs.is_finite() {
        return Err(ScriptError::InvalidTime { time: secs });
    }
    Ok(secs_to_micros(secs))
}

/// Convert microseconds to seconds
#[inline]
pub fn micros_to_secs(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SECOND
}

/// Half-open interval `[start_micros, stop_micros)`.
///
/// A range with `stop_micros <= start_micros` is instantaneous: it completes
/// on the first update at or after `start_micros`. Such ranges are a normal
/// value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_micros: i64,
    pub stop_micros: i64,
}

impl TimeRange {
    /// Create a new time range. Degenerate ranges are accepted as-is.
    #[inline]
    pub fn new(start_micros: i64, stop_micros: i64) -> Self {
        Self {
            start_micros,
            stop_micros,
        }
    }

    /// A zero-length range at `micros`
    #[inline]
    pub fn instant(micros: i64) -> Self {
        Self::new(micros, micros)
    }

    #[inline]
    pub fn is_instantaneous(&self) -> bool {
        self.stop_micros <= self.start_micros
    }

    /// Length of the range, zero for instantaneous ranges
    #[inline]
    pub fn duration_micros(&self) -> i64 {
        self.stop_micros.saturating_sub(self.start_micros).max(0)
    }

    /// True once `now` has reached the start of the range
    #[inline]
    pub fn has_started(&self, now: i64) -> bool {
        now >= self.start_micros
    }

    /// True once `now` has reached the (exclusive) end of the range
    #[inline]
    pub fn has_elapsed(&self, now: i64) -> bool {
        now >= self.stop_micros
    }

    /// Check if this range intersects `(-inf, now]`
    #[inline]
    pub fn overlaps_until(&self, now: i64) -> bool {
        self.start_micros <= now
    }

    /// Check if a time lies within `[start, stop)`
    #[inline]
    pub fn contains(&self, micros: i64) -> bool {
        micros >= self.start_micros && micros < self.stop_micros
    }

    /// Normalize `now` within this range to `[0, 1]`.
    ///
    /// Instantaneous ranges always report `1.0`. The denominator is at least
    /// one microsecond.
    #[inline]
    pub fn progress(&self, now: i64) -> f32 {
        if self.is_instantaneous() || now >= self.stop_micros {
            return 1.0;
        }
        let span = (self.stop_micros as f64 - self.start_micros as f64).max(1.0);
        let elapsed = now as f64 - self.start_micros as f64;
        (elapsed / span).clamp(0.0, 1.0) as f32
    }

    /// Shift the whole range by `delta` microseconds
    #[inline]
    pub fn offset(&self, delta: i64) -> Self {
        Self::new(
            self.start_micros.saturating_add(delta),
            self.stop_micros.saturating_add(delta),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_micros_conversion() {
        assert_eq!(secs_to_micros(1.5), 1_500_000);
        assert_eq!(secs_to_micros(0.000_000_6), 1);
        assert_eq!(micros_to_secs(250_000), 0.25);
        assert!(try_secs_to_micros(f64::NAN).is_err());
        assert!(try_secs_to_micros(f64::INFINITY).is_err());
        assert_eq!(try_secs_to_micros(2.0).unwrap(), 2_000_000);
    }

    #[test]
    fn test_progress() {
        let range = TimeRange::new(1_000, 3_000);
        assert_eq!(range.progress(0), 0.0);
        assert_eq!(range.progress(1_000), 0.0);
        assert_eq!(range.progress(2_000), 0.5);
        assert_eq!(range.progress(3_000), 1.0);
        assert_eq!(range.progress(9_000), 1.0);
    }

    #[test]
    fn test_progress_on_extreme_ranges() {
        let wide = TimeRange::new(-10, i64::MAX);
        assert_eq!(wide.progress(-10), 0.0);
        assert!(wide.progress(i64::MAX / 2) > 0.49);
        assert_eq!(wide.progress(i64::MAX), 1.0);

        let full = TimeRange::new(i64::MIN, i64::MAX);
        assert_eq!(full.progress(i64::MIN), 0.0);
        assert!((full.progress(0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_range() {
        let backwards = TimeRange::new(5_000, 1_000);
        assert!(backwards.is_instantaneous());
        assert_eq!(backwards.duration_micros(), 0);
        assert_eq!(backwards.progress(5_000), 1.0);

        let point = TimeRange::instant(42);
        assert!(point.is_instantaneous());
        assert!(!point.contains(42));
        assert!(point.overlaps_until(42));
        assert!(!point.overlaps_until(41));
    }

    #[test]
    fn test_range_ordering_and_offset() {
        let a = TimeRange::new(0, 10);
        let b = TimeRange::new(0, 20);
        let c = TimeRange::new(5, 6);
        assert!(a < b && b < c);
        assert_eq!(c.offset(10), TimeRange::new(15, 16));
        assert!(a.contains(0) && !a.contains(10));
        assert!(a.has_started(0) && !a.has_elapsed(9) && a.has_elapsed(10));
    }
}
