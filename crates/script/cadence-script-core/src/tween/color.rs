//! Color tween

use nalgebra::Vector4;

use super::Tween;
use crate::actor::ActorHandle;

/// Linear RGBA blend of the actor's color. Finishing snaps to the destination.
pub struct ColorTween {
    target: ActorHandle,
    from: Option<Vector4<f32>>,
    to: Vector4<f32>,
}

impl ColorTween {
    pub fn new(target: ActorHandle, from: Option<Vector4<f32>>, to: Vector4<f32>) -> Self {
        Self { target, from, to }
    }

    pub fn to(target: ActorHandle, to: Vector4<f32>) -> Self {
        Self::new(target, None, to)
    }
}

impl Tween for ColorTween {
    fn init(&mut self) {
        if self.from.is_none() {
            self.from = Some(self.target.lock().color);
        }
    }

    fn update(&mut self, t: f32) {
        let from = self.from.unwrap_or(self.to);
        self.target.lock().color = from.lerp(&self.to, t);
    }

    fn finish(&mut self) {
        self.target.lock().color = self.to;
    }
}
