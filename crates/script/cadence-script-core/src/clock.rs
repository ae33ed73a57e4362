//! Clock sources consumed by the executor and scripters.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use instant::Instant;

use crate::time::micros_to_secs;

/// Monotonic microsecond time source.
///
/// Implementations must never go backwards within a session. The scheduler
/// only ever reads a clock; frame stepping is driven by the owning loop via
/// [`Clock::advance_frame`].
pub trait Clock: Send + Sync {
    /// Current time in microseconds
    fn micros(&self) -> i64;

    /// Current time in seconds
    #[inline]
    fn secs(&self) -> f64 {
        micros_to_secs(self.micros())
    }

    /// Called once per frame by the render loop. Real-time clocks ignore it.
    fn advance_frame(&self) {}
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn micros(&self) -> i64 {
        (**self).micros()
    }

    #[inline]
    fn advance_frame(&self) {
        (**self).advance_frame()
    }
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
    start_micros: i64,
}

impl SystemClock {
    /// Clock reading zero at creation
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Clock reading `start_micros` at creation
    pub fn starting_at(start_micros: i64) -> Self {
        Self {
            origin: Instant::now(),
            start_micros,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn micros(&self) -> i64 {
        let elapsed = self.origin.elapsed().as_micros();
        self.start_micros
            .saturating_add(i64::try_from(elapsed).unwrap_or(i64::MAX))
    }
}

/// Deterministic clock that only moves when told to.
///
/// Each [`advance_frame`](Clock::advance_frame) adds `step_micros`; `set` and
/// `advance` move it directly. Used for offline rendering and tests.
#[derive(Debug)]
pub struct SteppingClock {
    now: AtomicI64,
    step_micros: AtomicI64,
}

impl SteppingClock {
    pub fn new(start_micros: i64, step_micros: i64) -> Self {
        Self {
            now: AtomicI64::new(start_micros),
            step_micros: AtomicI64::new(step_micros),
        }
    }

    /// Jump to an absolute time. Callers are responsible for monotonicity.
    pub fn set(&self, micros: i64) {
        self.now.store(micros, Ordering::Release);
    }

    /// Move forward by `delta` microseconds and return the new time
    pub fn advance(&self, delta: i64) -> i64 {
        self.now.fetch_add(delta, Ordering::AcqRel) + delta
    }

    pub fn step_micros(&self) -> i64 {
        self.step_micros.load(Ordering::Acquire)
    }

    pub fn set_step_micros(&self, step_micros: i64) {
        self.step_micros.store(step_micros, Ordering::Release);
    }
}

impl Clock for SteppingClock {
    #[inline]
    fn micros(&self) -> i64 {
        self.now.load(Ordering::Acquire)
    }

    fn advance_frame(&self) {
        self.advance(self.step_micros());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_clock_advances_per_frame() {
        let clock = SteppingClock::new(1_000, 16_667);
        assert_eq!(clock.micros(), 1_000);
        clock.advance_frame();
        clock.advance_frame();
        assert_eq!(clock.micros(), 1_000 + 2 * 16_667);
        assert_eq!(clock.advance(3), 1_000 + 2 * 16_667 + 3);
        clock.set(0);
        assert_eq!(clock.micros(), 0);
        assert_eq!(clock.secs(), 0.0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::starting_at(500);
        let a = clock.micros();
        let b = clock.micros();
        assert!(a >= 500);
        assert!(b >= a);
    }

    #[test]
    fn shared_clock_forwards() {
        let stepping = Arc::new(SteppingClock::new(0, 10));
        let shared: SharedClock = stepping.clone();
        shared.advance_frame();
        assert_eq!(stepping.micros(), 10);
        assert_eq!(shared.micros(), 10);
    }
}
