//! Cadence Script Core
//!
//! Frame-driven animation scheduling: tweens and one-shot callbacks are
//! queued from any thread and advanced once per frame by the render thread
//! against a shared clock.

pub mod action;
pub mod actor;
pub mod clock;
pub mod config;
pub mod ease;
pub mod error;
pub mod executor;
pub mod scripter;
pub mod slots;
pub mod time;
pub mod tween;
pub mod tween_actor;

// Re-export common types for convenience
pub use action::{ActionRef, ActionState, ScriptAction, ScriptRunnable, TweenAction};
pub use actor::{Actor, ActorHandle, Pose};
pub use clock::{Clock, SharedClock, SteppingClock, SystemClock};
pub use config::{ClockConfig, ScriptConfig};
pub use ease::{Ease, EaseCurve};
pub use error::ScriptError;
pub use executor::{ExecutorHandle, ScriptExecutor};
pub use scripter::Scripter;
pub use slots::ActionSlots;
pub use time::{micros_to_secs, secs_to_micros, TimeRange};
pub use tween::{
    ColorTween, FnTween, MoveTween, PathTween, PovLerpTween, RotateTween, ScaleTween, Tween,
};
pub use tween_actor::{TweenActor, TweenProperty};

/// Script result type
pub type Result<T> = core::result::Result<T, ScriptError>;
