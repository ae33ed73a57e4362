//! Ease: a delay, a duration and a curve mapping linear progress to eased
//! progress.

use std::fmt;
use std::sync::Arc;

use crate::error::ScriptError;
use crate::time::{micros_to_secs, try_secs_to_micros};

/// Normalization curve applied to linear progress `t` in `[0, 1]`.
///
/// Built-in curves are clamped and map `0 -> 0` and `1 -> 1` exactly.
/// `Custom` curves are applied as given, except on a tween's final update.
#[derive(Clone, Default)]
pub enum EaseCurve {
    #[default]
    Linear,
    /// Smoothstep: `3t^2 - 2t^3`
    Smooth,
    /// First half of `Smooth`, rescaled: slow start, full speed at the end
    SmoothIn,
    /// Second half of `Smooth`, rescaled: full speed start, slow end
    SmoothOut,
    /// Smootherstep: `6t^5 - 15t^4 + 10t^3`
    Smoother,
    /// First half of `Smoother`, rescaled
    SmootherIn,
    /// Second half of `Smoother`, rescaled
    SmootherOut,
    /// Caller-supplied curve
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

#[inline]
fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn smoother(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

impl EaseCurve {
    /// Wrap a closure as a curve.
    ///
    /// The closure is not clamped. A [`TweenAction`](crate::TweenAction)
    /// still delivers exactly `1.0` on its final update.
    pub fn custom(func: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(func))
    }

    /// Get the name of this curve
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Smooth => "smooth",
            Self::SmoothIn => "smooth_in",
            Self::SmoothOut => "smooth_out",
            Self::Smoother => "smoother",
            Self::SmootherIn => "smoother_in",
            Self::SmootherOut => "smoother_out",
            Self::Custom(_) => "custom",
        }
    }

    /// Map linear progress to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let curve: fn(f32) -> f32 = match self {
            Self::Custom(func) => return func(t),
            Self::Linear => |t| t,
            Self::Smooth => smooth,
            Self::SmoothIn => |t| 2.0 * smooth(0.5 * t),
            Self::SmoothOut => |t| 2.0 * smooth(0.5 + 0.5 * t) - 1.0,
            Self::Smoother => smoother,
            Self::SmootherIn => |t| 2.0 * smoother(0.5 * t),
            Self::SmootherOut => |t| 2.0 * smoother(0.5 + 0.5 * t) - 1.0,
        };
        if t <= 0.0 {
            0.0
        } else if t >= 1.0 {
            1.0
        } else {
            curve(t)
        }
    }
}

impl fmt::Debug for EaseCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for EaseCurve {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "smooth" => Self::Smooth,
            "smooth_in" => Self::SmoothIn,
            "smooth_out" => Self::SmoothOut,
            "smoother" => Self::Smoother,
            "smoother_in" => Self::SmootherIn,
            "smoother_out" => Self::SmootherOut,
            _ => Self::Linear,
        }
    }
}

/// Timing interval plus curve. `end = delay + duration`.
#[derive(Debug, Clone)]
pub struct Ease {
    delay_micros: i64,
    duration_micros: i64,
    curve: EaseCurve,
}

impl Ease {
    pub fn new(delay_micros: i64, duration_micros: i64, curve: EaseCurve) -> Self {
        Self {
            delay_micros,
            duration_micros,
            curve,
        }
    }

    /// Build from seconds. Non-finite inputs are rejected.
    pub fn from_secs(delay_secs: f64, duration_secs: f64, curve: EaseCurve) -> Result<Self, ScriptError> {
        Ok(Self::new(
            try_secs_to_micros(delay_secs)?,
            try_secs_to_micros(duration_secs)?,
            curve,
        ))
    }

    pub fn linear(delay_micros: i64, duration_micros: i64) -> Self {
        Self::new(delay_micros, duration_micros, EaseCurve::Linear)
    }

    pub fn smooth(delay_micros: i64, duration_micros: i64) -> Self {
        Self::new(delay_micros, duration_micros, EaseCurve::Smooth)
    }

    pub fn smooth_in(delay_micros: i64, duration_micros: i64) -> Self {
        Self::new(delay_micros, duration_micros, EaseCurve::SmoothIn)
    }

    pub fn smooth_out(delay_micros: i64, duration_micros: i64) -> Self {
        Self::new(delay_micros, duration_micros, EaseCurve::SmoothOut)
    }

    pub fn smoother(delay_micros: i64, duration_micros: i64) -> Self {
        Self::new(delay_micros, duration_micros, EaseCurve::Smoother)
    }

    pub fn smoother_in(delay_micros: i64, duration_micros: i64) -> Self {
        Self::new(delay_micros, duration_micros, EaseCurve::SmootherIn)
    }

    pub fn smoother_out(delay_micros: i64, duration_micros: i64) -> Self {
        Self::new(delay_micros, duration_micros, EaseCurve::SmootherOut)
    }

    #[inline]
    pub fn delay_micros(&self) -> i64 {
        self.delay_micros
    }

    #[inline]
    pub fn duration_micros(&self) -> i64 {
        self.duration_micros
    }

    #[inline]
    pub fn end_micros(&self) -> i64 {
        self.delay_micros.saturating_add(self.duration_micros)
    }

    pub fn delay_secs(&self) -> f64 {
        micros_to_secs(self.delay_micros)
    }

    pub fn duration_secs(&self) -> f64 {
        micros_to_secs(self.duration_micros)
    }

    pub fn end_secs(&self) -> f64 {
        micros_to_secs(self.end_micros())
    }

    #[inline]
    pub fn curve(&self) -> &EaseCurve {
        &self.curve
    }

    /// True when the ease ends at or before its start; tween slots apply such
    /// changes synchronously.
    #[inline]
    pub fn is_immediate(&self) -> bool {
        self.end_micros() <= 0
    }
}
