//! Configuration for executors, clocks and tween slots

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{SharedClock, SteppingClock, SystemClock};
use crate::ScriptError;

/// Clock selection.
///
/// A stepping clock starts at `start_micros` and advances by `step_micros`
/// per frame; otherwise real time is used, starting at `start_micros`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub stepping: bool,
    pub start_micros: i64,
    pub step_micros: i64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            stepping: false,
            start_micros: 0,
            step_micros: 16_667,
        }
    }
}

impl ClockConfig {
    /// Stepping clock at a fixed frame rate
    pub fn stepping_at_fps(fps: f64) -> Self {
        Self {
            stepping: true,
            start_micros: 0,
            step_micros: (1_000_000.0 / fps).round() as i64,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.step_micros < 0 {
            return Err(ScriptError::InvalidConfig {
                reason: format!("step_micros must not be negative, got {}", self.step_micros),
            });
        }
        Ok(())
    }

    /// Build the configured clock
    pub fn build(&self) -> Result<SharedClock, ScriptError> {
        self.validate()?;
        if self.stepping {
            if self.step_micros == 0 {
                warn!("stepping clock configured with a zero step; time will not advance");
            }
            debug!(
                start = self.start_micros,
                step = self.step_micros,
                "building stepping clock"
            );
            Ok(Arc::new(SteppingClock::new(
                self.start_micros,
                self.step_micros,
            )))
        } else {
            debug!(start = self.start_micros, "building system clock");
            Ok(Arc::new(SystemClock::starting_at(self.start_micros)))
        }
    }
}

/// Top-level scheduler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub clock: ClockConfig,
    /// Slots allocated for a property on its first tween
    pub slot_capacity: usize,
    /// A property whose slot array grew past this is released on cancel
    pub slot_release_capacity: usize,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            slot_capacity: 1,
            slot_release_capacity: 10,
        }
    }
}

impl ScriptConfig {
    /// Deterministic configuration for offline rendering
    pub fn offline(fps: f64) -> Self {
        Self {
            clock: ClockConfig::stepping_at_fps(fps),
            ..Self::default()
        }
    }

    /// Parse from JSON, filling unspecified fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ScriptError> {
        self.clock.validate()?;
        if self.slot_capacity == 0 {
            return Err(ScriptError::InvalidConfig {
                reason: "slot_capacity must be greater than 0".to_string(),
            });
        }
        if self.slot_release_capacity < self.slot_capacity {
            return Err(ScriptError::InvalidConfig {
                reason: "slot_release_capacity must be at least slot_capacity".to_string(),
            });
        }
        Ok(())
    }
}
