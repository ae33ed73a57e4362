//! Tweens: the strategy objects an action drives with eased progress.
//!
//! A tween sees `init` once before its first `update`, then any number of
//! `update(t)` calls with `t` in `[0, 1]`, then exactly one of `finish` or
//! `cancel`.

mod color;
mod transform;

pub use color::ColorTween;
pub use transform::{MoveTween, PathTween, PovLerpTween, RotateTween, ScaleTween};

/// Interpolated property change.
///
/// All callbacks run on the render thread that ticks the executor.
pub trait Tween: Send {
    /// Called before the first update
    fn init(&mut self) {}

    /// Apply progress `t`, where `0` is the start and `1` the end
    fn update(&mut self, t: f32);

    /// Called when the tween ran to completion
    fn finish(&mut self) {}

    /// Called instead of `finish` when the tween was cancelled
    fn cancel(&mut self) {}
}

impl<T: Tween + ?Sized> Tween for Box<T> {
    #[inline]
    fn init(&mut self) {
        (**self).init()
    }

    #[inline]
    fn update(&mut self, t: f32) {
        (**self).update(t)
    }

    #[inline]
    fn finish(&mut self) {
        (**self).finish()
    }

    #[inline]
    fn cancel(&mut self) {
        (**self).cancel()
    }
}

/// Tween built from a progress closure.
pub struct FnTween<F> {
    func: F,
}

impl<F> FnTween<F>
where
    F: FnMut(f32) + Send,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Tween for FnTween<F>
where
    F: FnMut(f32) + Send,
{
    #[inline]
    fn update(&mut self, t: f32) {
        (self.func)(t)
    }
}
