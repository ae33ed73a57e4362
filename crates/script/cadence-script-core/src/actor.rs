//! Animatable target state written by tweens.

use std::sync::Arc;

use nalgebra::{Matrix3, Matrix4, UnitQuaternion, Vector3, Vector4};
use parking_lot::Mutex;

/// Position, rotation, scale and color of something on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
    /// RGBA
    pub color: Vector4<f32>,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
            color: Vector4::repeat(1.0),
        }
    }
}

impl Actor {
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotation as a 3x3 matrix
    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// Set rotation from a 3x3 rotation matrix
    pub fn set_rotation_matrix(&mut self, rot: &Matrix3<f32>) {
        self.rotation = UnitQuaternion::from_matrix(rot);
    }

    /// Model matrix: translate * rotate * scale
    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Current position and rotation
    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Overwrite position and rotation
    #[inline]
    pub fn set_pose(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
    }

    /// Wrap in a shared handle
    pub fn into_handle(self) -> ActorHandle {
        Arc::new(Mutex::new(self))
    }
}

/// Position and orientation, the part of an actor a point of view cares about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Pose {
    pub fn new(position: Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }

    /// Interpolate position linearly and rotation spherically
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(&other.position, t),
            rotation: slerp(&self.rotation, &other.rotation, t),
        }
    }
}

/// Shared, lockable actor. Tweens lock it briefly on every update.
pub type ActorHandle = Arc<Mutex<Actor>>;

/// Spherical interpolation that never panics.
///
/// Falls back to the nearer endpoint when the arc between the two rotations
/// is degenerate.
pub fn slerp(from: &UnitQuaternion<f32>, to: &UnitQuaternion<f32>, t: f32) -> UnitQuaternion<f32> {
    from.try_slerp(to, t, 1.0e-6)
        .unwrap_or(if t < 0.5 { *from } else { *to })
}
