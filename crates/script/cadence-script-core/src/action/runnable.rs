//! One-shot callback scheduled at a point in time.

use std::fmt;

use parking_lot::Mutex;

use super::{ActionState, ScriptAction, StateCell};
use crate::time::TimeRange;

type Callback = Box<dyn FnOnce() + Send>;

/// Runs a closure once, on the first update at or after `at_micros`.
///
/// A cancel before that point drops the closure without running it.
pub struct ScriptRunnable {
    at_micros: i64,
    state: StateCell,
    func: Mutex<Option<Callback>>,
}

impl ScriptRunnable {
    pub fn new(at_micros: i64, func: impl FnOnce() + Send + 'static) -> Self {
        Self {
            at_micros,
            state: StateCell::default(),
            func: Mutex::new(Some(Box::new(func))),
        }
    }

    #[inline]
    pub fn state(&self) -> ActionState {
        self.state.state()
    }
}

impl ScriptAction for ScriptRunnable {
    #[inline]
    fn time_range(&self) -> TimeRange {
        TimeRange::instant(self.at_micros)
    }

    fn update(&self, now: i64) -> bool {
        if self.state.is_complete() {
            if self.state.take_cancel() {
                self.func.lock().take();
            }
            return true;
        }
        if now < self.at_micros {
            return false;
        }
        if self.state.advance(ActionState::Pending, ActionState::Complete) {
            let func = self.func.lock().take();
            if let Some(func) = func {
                func();
            }
        } else {
            // Lost to a concurrent cancel
            self.state.take_cancel();
            self.func.lock().take();
        }
        true
    }

    fn cancel(&self) {
        self.state.request_cancel();
    }

    #[inline]
    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

impl fmt::Debug for ScriptRunnable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRunnable")
            .field("at_micros", &self.at_micros)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
