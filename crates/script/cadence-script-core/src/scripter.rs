//! Fluent script builder with its own virtual time cursor.

use std::sync::Arc;

use crate::action::{ActionRef, ScriptRunnable, TweenAction};
use crate::clock::{Clock, SharedClock};
use crate::ease::Ease;
use crate::executor::ExecutorHandle;
use crate::time::{micros_to_secs, secs_to_micros};
use crate::tween::Tween;

/// Schedules actions relative to a cursor instead of the live clock.
///
/// ```
/// use std::sync::Arc;
/// use cadence_script::{Ease, FnTween, ScriptExecutor, Scripter, SteppingClock};
///
/// let exec = ScriptExecutor::new(Arc::new(SteppingClock::new(0, 16_667)));
/// let mut script = Scripter::new(exec.handle());
/// script
///     .exec(FnTween::new(|_| {}), Some(&Ease::smooth(0, 1_000_000)))
///     .sync()
///     .exec_fn(|| println!("first tween done"));
/// assert_eq!(script.time_micros(), 1_000_000);
/// ```
pub struct Scripter {
    exec: ExecutorHandle,
    time: i64,
    prev_action_end: Option<i64>,
    tracked: Option<Vec<ActionRef>>,
}

impl Scripter {
    /// Scripter whose cursor starts at the executor's current time
    pub fn new(exec: ExecutorHandle) -> Self {
        let time = exec.now_micros();
        Self {
            exec,
            time,
            prev_action_end: None,
            tracked: None,
        }
    }

    /// Scripter that remembers every action it schedules so they can be
    /// cancelled together
    pub fn with_cancellation(exec: ExecutorHandle) -> Self {
        Self {
            tracked: Some(Vec::new()),
            ..Self::new(exec)
        }
    }

    #[inline]
    pub fn executor(&self) -> &ExecutorHandle {
        &self.exec
    }

    #[inline]
    pub fn clock(&self) -> &SharedClock {
        self.exec.clock()
    }

    /// Cursor position in microseconds
    #[inline]
    pub fn time_micros(&self) -> i64 {
        self.time
    }

    pub fn time_secs(&self) -> f64 {
        micros_to_secs(self.time)
    }

    /// Clock time in microseconds
    #[inline]
    pub fn now_micros(&self) -> i64 {
        self.exec.clock().micros()
    }

    pub fn now_secs(&self) -> f64 {
        micros_to_secs(self.now_micros())
    }

    /// How far the cursor is ahead of the clock
    #[inline]
    pub fn delay_micros(&self) -> i64 {
        self.time - self.now_micros()
    }

    pub fn delay_secs(&self) -> f64 {
        micros_to_secs(self.delay_micros())
    }

    pub fn seek_micros(&mut self, micros: i64) -> &mut Self {
        self.set_time(micros);
        self
    }

    pub fn seek_secs(&mut self, secs: f64) -> &mut Self {
        self.seek_micros(secs_to_micros(secs))
    }

    pub fn skip_micros(&mut self, micros: i64) -> &mut Self {
        self.set_time(self.time.saturating_add(micros));
        self
    }

    pub fn skip_secs(&mut self, secs: f64) -> &mut Self {
        self.skip_micros(secs_to_micros(secs))
    }

    /// Move the cursor back to the clock's current time
    pub fn reset(&mut self) -> &mut Self {
        let now = self.now_micros();
        self.set_time(now);
        self
    }

    /// Move the cursor to the end of the most recently scheduled action.
    ///
    /// No effect if nothing was scheduled since the last seek, skip, reset
    /// or sync.
    pub fn sync(&mut self) -> &mut Self {
        if let Some(end) = self.prev_action_end {
            self.set_time(end);
        }
        self
    }

    /// Schedule a tween at the cursor. Without an ease the tween completes
    /// instantly at the cursor.
    pub fn exec(&mut self, tween: impl Tween + 'static, ease: Option<&Ease>) -> &mut Self {
        let action = match ease {
            Some(ease) => TweenAction::with_ease(self.time, tween, ease),
            None => TweenAction::instant(self.time, tween),
        };
        self.add(Arc::new(action));
        self
    }

    /// Run a closure once when the clock reaches the cursor
    pub fn exec_fn(&mut self, func: impl FnOnce() + Send + 'static) -> &mut Self {
        self.add(Arc::new(ScriptRunnable::new(self.time, func)));
        self
    }

    /// Schedule a tween relative to the clock, ignoring the cursor
    pub fn exec_now(&mut self, tween: impl Tween + 'static, ease: Option<&Ease>) -> &mut Self {
        let now = self.now_micros();
        let action = match ease {
            Some(ease) => TweenAction::with_ease(now, tween, ease),
            None => TweenAction::instant(now, tween),
        };
        self.add(Arc::new(action));
        self
    }

    /// Hand a prebuilt action straight to the executor
    pub fn exec_action_now(&mut self, action: ActionRef) -> &mut Self {
        self.add(action);
        self
    }

    /// True when this scripter tracks its actions
    #[inline]
    pub fn can_cancel(&self) -> bool {
        self.tracked.is_some()
    }

    /// Tracked actions, empty when not tracking
    pub fn actions(&self) -> Vec<ActionRef> {
        self.tracked.clone().unwrap_or_default()
    }

    /// Cancel every tracked action and forget them
    pub fn cancel(&mut self) {
        if let Some(tracked) = self.tracked.as_mut() {
            for action in tracked.drain(..) {
                action.cancel();
            }
        }
    }

    fn set_time(&mut self, time: i64) {
        self.time = time;
        self.prev_action_end = None;
    }

    fn add(&mut self, action: ActionRef) {
        let stop = action.time_range().stop_micros;
        if stop < i64::MAX {
            self.prev_action_end = Some(stop);
        }
        if let Some(tracked) = self.tracked.as_mut() {
            tracked.push(action.clone());
        }
        self.exec.add_action(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use crate::executor::ScriptExecutor;
    use crate::tween::FnTween;

    fn setup(start: i64) -> (ScriptExecutor, Arc<SteppingClock>) {
        let clock = Arc::new(SteppingClock::new(start, 1_000));
        (ScriptExecutor::new(clock.clone()), clock)
    }

    #[test]
    fn cursor_starts_at_clock() {
        let (exec, clock) = setup(5_000);
        let script = Scripter::new(exec.handle());
        assert_eq!(script.time_micros(), 5_000);
        clock.set(7_000);
        assert_eq!(script.delay_micros(), -2_000);
        assert_eq!(script.now_secs(), 0.007);
    }

    #[test]
    fn seek_skip_reset() {
        let (exec, clock) = setup(0);
        let mut script = Scripter::new(exec.handle());
        script.seek_secs(1.5).skip_micros(250_000);
        assert_eq!(script.time_micros(), 1_750_000);
        assert_eq!(script.time_secs(), 1.75);
        clock.set(300);
        script.reset();
        assert_eq!(script.time_micros(), 300);
        assert_eq!(script.delay_secs(), 0.0);
    }

    #[test]
    fn sync_moves_to_last_action_end_once() {
        let (exec, _clock) = setup(0);
        let mut script = Scripter::new(exec.handle());
        script
            .skip_micros(100)
            .exec(FnTween::new(|_| {}), Some(&Ease::linear(50, 1_000)))
            .sync();
        assert_eq!(script.time_micros(), 1_150);
        // Second sync is a no-op
        script.skip_micros(10).sync();
        assert_eq!(script.time_micros(), 1_160);
    }

    #[test]
    fn exec_without_ease_is_instant_at_cursor() {
        let (exec, _clock) = setup(0);
        let mut script = Scripter::with_cancellation(exec.handle());
        script.seek_micros(400).exec(FnTween::new(|_| {}), None);
        let actions = script.actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].time_range().start_micros, 400);
        assert_eq!(actions[0].time_range().stop_micros, 400);
    }

    #[test]
    fn exec_now_ignores_cursor() {
        let (exec, _clock) = setup(2_000);
        let mut script = Scripter::with_cancellation(exec.handle());
        script
            .seek_micros(1_000_000)
            .exec_now(FnTween::new(|_| {}), Some(&Ease::linear(10, 20)));
        assert_eq!(script.actions()[0].time_range().start_micros, 2_010);
        assert_eq!(script.time_micros(), 1_000_000);
    }

    #[test]
    fn untracked_scripter_cannot_cancel() {
        let (exec, _clock) = setup(0);
        let mut script = Scripter::new(exec.handle());
        script.exec_fn(|| {});
        assert!(!script.can_cancel());
        assert!(script.actions().is_empty());
        script.cancel();
    }

    #[test]
    fn cancel_cancels_tracked_actions() {
        let (exec, _clock) = setup(0);
        let mut script = Scripter::with_cancellation(exec.handle());
        script.exec_fn(|| {}).skip_micros(10).exec_fn(|| {});
        let actions = script.actions();
        assert!(script.can_cancel());
        script.cancel();
        assert!(actions.iter().all(|a| a.is_complete()));
        assert!(script.actions().is_empty());
    }
}
