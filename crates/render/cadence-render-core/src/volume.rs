//! Cull volumes in normalized device space.

use serde::{Deserialize, Serialize};

/// Point-containment test used to cull drawables.
pub trait Volume: Send + Sync {
    fn contains(&self, x: f32, y: f32, z: f32) -> bool;
}

impl<F> Volume for F
where
    F: Fn(f32, f32, f32) -> bool + Send + Sync,
{
    #[inline]
    fn contains(&self, x: f32, y: f32, z: f32) -> bool {
        self(x, y, z)
    }
}

/// Axis-aligned box with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// The normalized device cube `[-1, 1]^3`
    pub fn ndc() -> Self {
        Self::new([-1.0; 3], [1.0; 3])
    }

    /// True if `min <= max` on every axis
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self.min[i] <= self.max[i])
    }
}

impl Volume for Aabb {
    #[inline]
    fn contains(&self, x: f32, y: f32, z: f32) -> bool {
        x >= self.min[0]
            && x <= self.max[0]
            && y >= self.min[1]
            && y <= self.max[1]
            && z >= self.min[2]
            && z <= self.max[2]
    }
}
