//! Tweens over an actor's spatial transform

use nalgebra::{UnitQuaternion, Vector3};

use super::Tween;
use crate::actor::{slerp, ActorHandle, Pose};

/// Linear move of the actor's position.
///
/// When no start is given, the actor's position at `init` is used.
pub struct MoveTween {
    target: ActorHandle,
    from: Option<Vector3<f32>>,
    to: Vector3<f32>,
}

impl MoveTween {
    pub fn new(target: ActorHandle, from: Option<Vector3<f32>>, to: Vector3<f32>) -> Self {
        Self { target, from, to }
    }

    pub fn to(target: ActorHandle, to: Vector3<f32>) -> Self {
        Self::new(target, None, to)
    }
}

impl Tween for MoveTween {
    fn init(&mut self) {
        if self.from.is_none() {
            self.from = Some(self.target.lock().position);
        }
    }

    fn update(&mut self, t: f32) {
        let from = self.from.unwrap_or(self.to);
        self.target.lock().position = from.lerp(&self.to, t);
    }
}

/// Linear change of the actor's scale
pub struct ScaleTween {
    target: ActorHandle,
    from: Option<Vector3<f32>>,
    to: Vector3<f32>,
}

impl ScaleTween {
    pub fn new(target: ActorHandle, from: Option<Vector3<f32>>, to: Vector3<f32>) -> Self {
        Self { target, from, to }
    }

    pub fn to(target: ActorHandle, to: Vector3<f32>) -> Self {
        Self::new(target, None, to)
    }
}

impl Tween for ScaleTween {
    fn init(&mut self) {
        if self.from.is_none() {
            self.from = Some(self.target.lock().scale);
        }
    }

    fn update(&mut self, t: f32) {
        let from = self.from.unwrap_or(self.to);
        self.target.lock().scale = from.lerp(&self.to, t);
    }
}

/// Spherical interpolation of the actor's rotation
pub struct RotateTween {
    target: ActorHandle,
    from: Option<UnitQuaternion<f32>>,
    to: UnitQuaternion<f32>,
}

impl RotateTween {
    pub fn new(
        target: ActorHandle,
        from: Option<UnitQuaternion<f32>>,
        to: UnitQuaternion<f32>,
    ) -> Self {
        Self { target, from, to }
    }

    pub fn to(target: ActorHandle, to: UnitQuaternion<f32>) -> Self {
        Self::new(target, None, to)
    }
}

impl Tween for RotateTween {
    fn init(&mut self) {
        if self.from.is_none() {
            self.from = Some(self.target.lock().rotation);
        }
    }

    fn update(&mut self, t: f32) {
        let from = self.from.unwrap_or(self.to);
        self.target.lock().rotation = slerp(&from, &self.to, t);
    }
}

/// Moves the actor along an arbitrary path evaluated at the eased progress.
pub struct PathTween {
    target: ActorHandle,
    path: Box<dyn FnMut(f32) -> Vector3<f32> + Send>,
}

impl PathTween {
    pub fn new(target: ActorHandle, path: impl FnMut(f32) -> Vector3<f32> + Send + 'static) -> Self {
        Self {
            target,
            path: Box::new(path),
        }
    }
}

impl Tween for PathTween {
    fn update(&mut self, t: f32) {
        let position = (self.path)(t);
        self.target.lock().position = position;
    }
}

/// Point-of-view move: lerps position and slerps rotation together.
pub struct PovLerpTween {
    target: ActorHandle,
    from: Option<Pose>,
    to: Pose,
}

impl PovLerpTween {
    pub fn new(target: ActorHandle, from: Option<Pose>, to: Pose) -> Self {
        Self { target, from, to }
    }

    pub fn to(target: ActorHandle, to: Pose) -> Self {
        Self::new(target, None, to)
    }
}

impl Tween for PovLerpTween {
    fn init(&mut self) {
        if self.from.is_none() {
            self.from = Some(self.target.lock().pose());
        }
    }

    fn update(&mut self, t: f32) {
        let from = self.from.unwrap_or(self.to);
        let pose = from.lerp(&self.to, t);
        self.target.lock().set_pose(&pose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn move_captures_start_at_init() {
        let actor = Actor::at(Vector3::new(1.0, 1.0, 1.0)).into_handle();
        let mut tween = MoveTween::to(actor.clone(), Vector3::new(3.0, 1.0, -1.0));

        // Moved after construction, before init
        actor.lock().position = Vector3::new(-1.0, 1.0, 1.0);
        tween.init();
        tween.update(0.5);
        assert_relative_eq!(actor.lock().position, Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-6);
        tween.update(1.0);
        assert_relative_eq!(actor.lock().position, Vector3::new(3.0, 1.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn explicit_start_overrides_target() {
        let actor = Actor::default().into_handle();
        let mut tween = ScaleTween::new(
            actor.clone(),
            Some(Vector3::new(2.0, 2.0, 2.0)),
            Vector3::new(4.0, 4.0, 4.0),
        );
        tween.init();
        tween.update(0.0);
        assert_relative_eq!(actor.lock().scale, Vector3::new(2.0, 2.0, 2.0));
        tween.update(0.25);
        assert_relative_eq!(actor.lock().scale, Vector3::new(2.5, 2.5, 2.5));
    }

    #[test]
    fn rotate_slerps() {
        let actor = Actor::default().into_handle();
        let to = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        let mut tween = RotateTween::to(actor.clone(), to);
        tween.init();
        tween.update(0.5);
        assert_relative_eq!(actor.lock().rotation.angle(), FRAC_PI_2 / 2.0, epsilon = 1e-3);
        tween.update(1.0);
        assert_relative_eq!(actor.lock().rotation.angle_to(&to), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn path_evaluates_closure() {
        let actor = Actor::default().into_handle();
        let mut tween = PathTween::new(actor.clone(), |t| Vector3::new(t, t * t, 0.0));
        tween.update(0.5);
        assert_relative_eq!(actor.lock().position, Vector3::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn pov_lerp_moves_and_turns() {
        let actor = Actor::default().into_handle();
        let to = Pose::new(
            Vector3::new(0.0, 0.0, -10.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2),
        );
        let mut tween = PovLerpTween::to(actor.clone(), to);
        tween.init();
        tween.update(0.5);
        let pose = actor.lock().pose();
        assert_relative_eq!(pose.position, Vector3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
        assert_relative_eq!(pose.rotation.angle(), FRAC_PI_2 / 2.0, epsilon = 1e-3);
    }
}
