//! Render list configuration

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::sorter::SortOrder;
use crate::volume::Aabb;

/// Configuration for a depth-sorted [`RenderList`](crate::RenderList).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Slots reserved up front
    pub initial_capacity: usize,
    pub order: SortOrder,
    /// Cull volume in normalized device space; `None` renders everything
    pub cull_volume: Option<Aabb>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 16,
            order: SortOrder::BackToFront,
            cull_volume: None,
        }
    }
}

impl RenderConfig {
    /// Back-to-front with culling to the view volume, for blended geometry
    pub fn transparent() -> Self {
        Self {
            order: SortOrder::BackToFront,
            cull_volume: Some(Aabb::ndc()),
            ..Self::default()
        }
    }

    /// Front-to-back with culling to the view volume, for opaque geometry
    pub fn opaque() -> Self {
        Self {
            order: SortOrder::FrontToBack,
            cull_volume: Some(Aabb::ndc()),
            ..Self::default()
        }
    }

    /// Parse from JSON, filling unspecified fields with defaults
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RenderError> {
        if let Some(volume) = &self.cull_volume {
            if !volume.is_valid() {
                return Err(RenderError::InvalidConfig {
                    reason: format!(
                        "cull volume min {:?} exceeds max {:?}",
                        volume.min, volume.max
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(RenderConfig::default().validate().is_ok());
        assert_eq!(RenderConfig::opaque().order, SortOrder::FrontToBack);
        assert_eq!(RenderConfig::transparent().cull_volume, Some(Aabb::ndc()));
    }

    #[test]
    fn from_json() {
        let config = RenderConfig::from_json(
            r#"{ "order": "front_to_back", "cull_volume": { "min": [-1, -1, -1], "max": [1, 1, 0] } }"#,
        )
        .unwrap();
        assert_eq!(config.order, SortOrder::FrontToBack);
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.cull_volume.unwrap().max, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn inverted_volume_is_rejected() {
        let err = RenderConfig::from_json(r#"{ "cull_volume": { "min": [1, 1, 1], "max": [0, 0, 0] } }"#)
            .unwrap_err();
        assert_eq!(err.category(), "config");
        let err = RenderConfig::from_json("not json").unwrap_err();
        assert_eq!(err.category(), "serialization");
    }
}
