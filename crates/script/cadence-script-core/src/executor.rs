//! Frame-driven action scheduler.
//!
//! Producers on any thread hold an [`ExecutorHandle`] and enqueue actions or
//! a clear request. Once per frame the render thread calls
//! [`ScriptExecutor::tick`], which first applies every queued mutation in
//! FIFO order and then advances every action whose start time has arrived.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::action::{ActionRef, ActionSet, TweenAction};
use crate::clock::{Clock, SharedClock};
use crate::config::ScriptConfig;
use crate::ease::Ease;
use crate::tween::Tween;
use crate::Result;

enum Mutation {
    Add(ActionRef),
    Clear,
}

struct Shared {
    clock: SharedClock,
    queue: Mutex<Vec<Mutation>>,
    live_count: AtomicUsize,
}

/// Cloneable, thread-safe entry point for scheduling work.
#[derive(Clone)]
pub struct ExecutorHandle {
    shared: Arc<Shared>,
}

impl ExecutorHandle {
    /// Clock the executor runs on
    #[inline]
    pub fn clock(&self) -> &SharedClock {
        &self.shared.clock
    }

    /// Current clock time in microseconds
    #[inline]
    pub fn now_micros(&self) -> i64 {
        self.shared.clock.micros()
    }

    /// Queue an action for activation on the next tick
    pub fn add_action(&self, action: ActionRef) {
        self.shared.queue.lock().push(Mutation::Add(action));
    }

    /// Queue several actions under a single lock
    pub fn add_actions<I>(&self, actions: I)
    where
        I: IntoIterator<Item = ActionRef>,
    {
        let mut queue = self.shared.queue.lock();
        queue.extend(actions.into_iter().map(Mutation::Add));
    }

    /// Schedule a tween relative to the current clock time
    pub fn add_tween(&self, tween: impl Tween + 'static, ease: &Ease) -> ActionRef {
        let action: ActionRef = Arc::new(TweenAction::with_ease(self.now_micros(), tween, ease));
        self.add_action(action.clone());
        action
    }

    /// Schedule several tweens that all start from the same clock reading
    pub fn add_tweens<I>(&self, tweens: I, ease: &Ease) -> Vec<ActionRef>
    where
        I: IntoIterator<Item = Box<dyn Tween>>,
    {
        let now = self.now_micros();
        let actions: Vec<ActionRef> = tweens
            .into_iter()
            .map(|tween| Arc::new(TweenAction::from_boxed_with_ease(now, tween, ease)) as ActionRef)
            .collect();
        self.add_actions(actions.iter().cloned());
        actions
    }

    /// Queue a request to cancel every live action.
    ///
    /// Actions queued before this call are cancelled too; actions queued
    /// after it survive.
    pub fn cancel_all(&self) {
        self.shared.queue.lock().push(Mutation::Clear);
    }

    /// Live actions as of the last tick
    #[inline]
    pub fn action_count(&self) -> usize {
        self.shared.live_count.load(Ordering::Acquire)
    }
}

/// Owns the live action set. Only the render thread ticks it.
pub struct ScriptExecutor {
    handle: ExecutorHandle,
    live: ActionSet,
    drained: VecDeque<Mutation>,
}

impl ScriptExecutor {
    pub fn new(clock: SharedClock) -> Self {
        Self {
            handle: ExecutorHandle {
                shared: Arc::new(Shared {
                    clock,
                    queue: Mutex::new(Vec::new()),
                    live_count: AtomicUsize::new(0),
                }),
            },
            live: ActionSet::default(),
            drained: VecDeque::new(),
        }
    }

    /// Build with the configured clock
    pub fn from_config(config: &ScriptConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.clock.build()?))
    }

    /// Handle for scheduling from other threads
    #[inline]
    pub fn handle(&self) -> ExecutorHandle {
        self.handle.clone()
    }

    #[inline]
    pub fn clock(&self) -> &SharedClock {
        self.handle.clock()
    }

    #[inline]
    pub fn now_micros(&self) -> i64 {
        self.handle.now_micros()
    }

    pub fn add_action(&self, action: ActionRef) {
        self.handle.add_action(action)
    }

    pub fn add_actions<I>(&self, actions: I)
    where
        I: IntoIterator<Item = ActionRef>,
    {
        self.handle.add_actions(actions)
    }

    pub fn add_tween(&self, tween: impl Tween + 'static, ease: &Ease) -> ActionRef {
        self.handle.add_tween(tween, ease)
    }

    pub fn add_tweens<I>(&self, tweens: I, ease: &Ease) -> Vec<ActionRef>
    where
        I: IntoIterator<Item = Box<dyn Tween>>,
    {
        self.handle.add_tweens(tweens, ease)
    }

    pub fn cancel_all(&self) {
        self.handle.cancel_all()
    }

    /// Live actions after the last drain or sweep
    #[inline]
    pub fn action_count(&self) -> usize {
        self.live.len()
    }

    /// Advance the clock by one frame, then tick
    pub fn tick_frame(&mut self) {
        self.handle.shared.clock.advance_frame();
        self.tick();
    }

    /// Apply queued mutations, then update every started action.
    ///
    /// Mutations queued while draining (for example by a cancel callback)
    /// are applied in the same tick. A panic raised by a callback propagates;
    /// mutations not yet applied stay queued for the next tick.
    pub fn tick(&mut self) {
        self.drain();
        if !self.live.is_empty() {
            let now = self.handle.now_micros();
            let retired = self.live.update_started(now);
            trace!(now, retired, live = self.live.len(), "tick");
        }
        self.publish_count();
    }

    fn drain(&mut self) {
        loop {
            if self.drained.is_empty() {
                let mut queue = self.handle.shared.queue.lock();
                if queue.is_empty() {
                    return;
                }
                self.drained.extend(queue.drain(..));
            }
            while let Some(mutation) = self.drained.pop_front() {
                match mutation {
                    Mutation::Add(action) => self.live.insert(action),
                    Mutation::Clear => {
                        let now = self.handle.now_micros();
                        let cancelled = self.live.cancel_all(now);
                        debug!("cancel_all: cancelled {} live actions at {}", cancelled, now);
                    }
                }
                self.publish_count();
            }
        }
    }

    #[inline]
    fn publish_count(&self) {
        self.handle
            .shared
            .live_count
            .store(self.live.len(), Ordering::Release);
    }
}
