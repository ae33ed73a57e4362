//! Error types for the script scheduler

use serde::{Deserialize, Serialize};

/// Errors raised while configuring clocks, eases and executors.
///
/// Scheduling itself never fails: degenerate time ranges complete
/// immediately, slot arrays grow instead of rejecting, and panics raised by
/// tween callbacks propagate out of `ScriptExecutor::tick`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ScriptError {
    /// A time in seconds that cannot be expressed in microseconds
    #[error("Invalid time value: {time}")]
    InvalidTime { time: f64 },

    /// Configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Configuration could not be parsed
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl ScriptError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidTime { .. } => "validation",
            Self::InvalidConfig { .. } => "config",
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for ScriptError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
