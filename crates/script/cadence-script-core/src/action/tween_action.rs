//! Action that drives a [`Tween`] across its time range.

use std::fmt;

use parking_lot::Mutex;

use super::{ActionState, ScriptAction, StateCell};
use crate::ease::{Ease, EaseCurve};
use crate::time::TimeRange;
use crate::tween::Tween;

/// Drives a tween with eased progress between `start` and `stop`.
///
/// The first update at or after `start` calls `init`; every update while
/// active passes `curve(progress)`; the update at or after `stop` passes
/// exactly `1.0` and calls `finish`. A cancel marks the action complete at
/// once and delivers `Tween::cancel` on the next update. Exactly one of
/// `finish` or `cancel` ever reaches the tween.
pub struct TweenAction {
    range: TimeRange,
    curve: Option<EaseCurve>,
    state: StateCell,
    tween: Mutex<Box<dyn Tween>>,
}

impl TweenAction {
    pub fn new(range: TimeRange, tween: impl Tween + 'static, curve: Option<EaseCurve>) -> Self {
        Self::from_boxed(range, Box::new(tween), curve)
    }

    pub fn from_boxed(range: TimeRange, tween: Box<dyn Tween>, curve: Option<EaseCurve>) -> Self {
        Self {
            range,
            curve,
            state: StateCell::default(),
            tween: Mutex::new(tween),
        }
    }

    /// Place a tween at `origin + ease.delay .. origin + ease.end`
    pub fn with_ease(origin: i64, tween: impl Tween + 'static, ease: &Ease) -> Self {
        Self::from_boxed_with_ease(origin, Box::new(tween), ease)
    }

    pub fn from_boxed_with_ease(origin: i64, tween: Box<dyn Tween>, ease: &Ease) -> Self {
        let range = TimeRange::new(
            origin.saturating_add(ease.delay_micros()),
            origin.saturating_add(ease.end_micros()),
        );
        Self::from_boxed(range, tween, Some(ease.curve().clone()))
    }

    /// Zero-length action at `at_micros`
    pub fn instant(at_micros: i64, tween: impl Tween + 'static) -> Self {
        Self::new(TimeRange::instant(at_micros), tween, None)
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state.state()
    }

    #[inline]
    pub fn curve(&self) -> Option<&EaseCurve> {
        self.curve.as_ref()
    }

    #[inline]
    fn eased(&self, t: f32) -> f32 {
        match &self.curve {
            Some(curve) => curve.apply(t),
            None => t,
        }
    }
}

impl ScriptAction for TweenAction {
    #[inline]
    fn time_range(&self) -> TimeRange {
        self.range
    }

    fn update(&self, now: i64) -> bool {
        loop {
            match self.state.state() {
                ActionState::Complete => {
                    if self.state.take_cancel() {
                        self.tween.lock().cancel();
                    }
                    return true;
                }
                ActionState::Pending => {
                    if !self.range.has_started(now) {
                        return false;
                    }
                    if !self
                        .state
                        .advance(ActionState::Pending, ActionState::Initializing)
                    {
                        continue;
                    }
                    self.tween.lock().init();
                    // Cancelled during init: loop around and deliver it
                    self.state
                        .advance(ActionState::Initializing, ActionState::Active);
                }
                // Left behind by an init that panicked; carry on as active
                ActionState::Initializing => {
                    self.state
                        .advance(ActionState::Initializing, ActionState::Active);
                }
                ActionState::Active => {
                    let elapsed = self.range.has_elapsed(now);
                    // The last update always lands on 1.0, whatever the curve
                    let p = if elapsed {
                        1.0
                    } else {
                        self.eased(self.range.progress(now))
                    };
                    let mut tween = self.tween.lock();
                    tween.update(p);
                    if !elapsed {
                        return false;
                    }
                    if self.state.advance(ActionState::Active, ActionState::Complete) {
                        tween.finish();
                        return true;
                    }
                }
            }
        }
    }

    fn cancel(&self) {
        self.state.request_cancel();
    }

    #[inline]
    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

impl fmt::Debug for TweenAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenAction")
            .field("range", &self.range)
            .field("curve", &self.curve)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
