//! Error types for depth sorting and render lists

use serde::{Deserialize, Serialize};

/// Errors raised by render list maintenance and configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RenderError {
    /// Index past the end of a render list
    #[error("Index {index} out of bounds for render list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Configuration could not be parsed
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl RenderError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::IndexOutOfBounds { .. } => "bounds",
            Self::InvalidConfig { .. } => "config",
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
