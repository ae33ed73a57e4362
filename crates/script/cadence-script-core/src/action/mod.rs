//! Schedulable actions and their lifecycle.

mod runnable;
mod set;
mod tween_action;

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::time::TimeRange;

pub use runnable::ScriptRunnable;
pub(crate) use set::ActionSet;
pub use tween_action::TweenAction;

/// A unit of scheduled work with a fixed time range.
///
/// `update` is only ever called from the thread that ticks the executor.
/// `cancel` and `is_complete` may be called from any thread.
pub trait ScriptAction: Send + Sync {
    /// Absolute range this action occupies
    fn time_range(&self) -> TimeRange;

    /// Advance to `now`. Returns true once the action is done and may be
    /// dropped by the executor.
    fn update(&self, now: i64) -> bool;

    /// Request cancellation. Idempotent, and a no-op once complete.
    fn cancel(&self);

    /// True once the action has finished or been cancelled
    fn is_complete(&self) -> bool;
}

/// Shared handle to a scheduled action
pub type ActionRef = Arc<dyn ScriptAction>;

/// Lifecycle of an action. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ActionState {
    /// Waiting for its start time
    Pending = 0,
    /// Running its one-time setup
    Initializing = 1,
    /// Receiving progress updates
    Active = 2,
    /// Finished or cancelled
    Complete = 3,
}

impl ActionState {
    #[inline]
    fn from_bits(bits: u8) -> Self {
        match bits & STATE_MASK {
            0 => Self::Pending,
            1 => Self::Initializing,
            2 => Self::Active,
            _ => Self::Complete,
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Initializing => "initializing",
            Self::Active => "active",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}

const STATE_MASK: u8 = 0b0011;
const CANCEL_PENDING: u8 = 0b0100;

/// Atomic lifecycle word shared by the built-in actions.
///
/// The low two bits hold the [`ActionState`]; a separate bit records that a
/// cancel was requested and its callback has not been delivered yet.
#[derive(Debug, Default)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    #[inline]
    pub(crate) fn state(&self) -> ActionState {
        ActionState::from_bits(self.0.load(Ordering::Acquire))
    }

    /// Move `from -> to`. Fails when another thread got there first.
    #[inline]
    pub(crate) fn advance(&self, from: ActionState, to: ActionState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Mark complete with a pending cancel unless already complete.
    /// Returns true if this call performed the transition.
    #[inline]
    pub(crate) fn request_cancel(&self) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                if ActionState::from_bits(bits) == ActionState::Complete {
                    None
                } else {
                    Some(ActionState::Complete as u8 | CANCEL_PENDING)
                }
            })
            .is_ok()
    }

    /// Clear the pending-cancel bit. Returns true exactly once per cancel.
    #[inline]
    pub(crate) fn take_cancel(&self) -> bool {
        self.0.fetch_and(!CANCEL_PENDING, Ordering::AcqRel) & CANCEL_PENDING != 0
    }

    #[inline]
    pub(crate) fn is_complete(&self) -> bool {
        self.state() == ActionState::Complete
    }
}
