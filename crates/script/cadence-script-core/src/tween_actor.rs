//! Actor whose properties can be tweened without piling up conflicting
//! animations.

use nalgebra::{UnitQuaternion, Vector3, Vector4};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::action::ActionRef;
use crate::actor::{Actor, ActorHandle};
use crate::config::ScriptConfig;
use crate::ease::Ease;
use crate::executor::ExecutorHandle;
use crate::slots::ActionSlots;
use crate::tween::{ColorTween, MoveTween, PathTween, RotateTween, ScaleTween, Tween};

/// Animatable property, each with its own slot list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TweenProperty {
    Move,
    Scale,
    Rotate,
    Color,
}

impl TweenProperty {
    pub const ALL: [TweenProperty; 4] = [Self::Move, Self::Scale, Self::Rotate, Self::Color];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Move => 0,
            Self::Scale => 1,
            Self::Rotate => 2,
            Self::Color => 3,
        }
    }
}

/// An [`Actor`] plus per-property bookkeeping of in-flight tweens.
///
/// `tween_*` calls without an ease (or with one that ends immediately)
/// set the value synchronously. Otherwise a tween is scheduled on the
/// executor and recorded in the property's slot list so that a later call
/// with `cancel_prev` can stop it.
pub struct TweenActor {
    actor: ActorHandle,
    exec: ExecutorHandle,
    slots: Mutex<[ActionSlots; 4]>,
    slot_capacity: usize,
    slot_release_capacity: usize,
}

impl TweenActor {
    pub fn new(exec: ExecutorHandle) -> Self {
        Self::with_actor(exec, Actor::default().into_handle())
    }

    /// Wrap an existing actor handle
    pub fn with_actor(exec: ExecutorHandle, actor: ActorHandle) -> Self {
        let defaults = ScriptConfig::default();
        Self {
            actor,
            exec,
            slots: Mutex::new(Default::default()),
            slot_capacity: defaults.slot_capacity,
            slot_release_capacity: defaults.slot_release_capacity,
        }
    }

    /// Use the slot sizing from `config`
    pub fn with_config(exec: ExecutorHandle, config: &ScriptConfig) -> Self {
        Self {
            slot_capacity: config.slot_capacity,
            slot_release_capacity: config.slot_release_capacity,
            ..Self::new(exec)
        }
    }

    #[inline]
    pub fn actor(&self) -> &ActorHandle {
        &self.actor
    }

    #[inline]
    pub fn executor(&self) -> &ExecutorHandle {
        &self.exec
    }

    /// Snapshot of the current actor state
    pub fn pose(&self) -> Actor {
        *self.actor.lock()
    }

    pub fn set_position(&self, position: Vector3<f32>) {
        self.actor.lock().position = position;
    }

    pub fn set_rotation(&self, rotation: UnitQuaternion<f32>) {
        self.actor.lock().rotation = rotation;
    }

    pub fn set_scale(&self, scale: Vector3<f32>) {
        self.actor.lock().scale = scale;
    }

    pub fn set_color(&self, color: Vector4<f32>) {
        self.actor.lock().color = color;
    }

    pub fn tween_position(
        &self,
        dest: Vector3<f32>,
        ease: Option<&Ease>,
        cancel_prev: bool,
    ) -> Option<ActionRef> {
        match scheduled(ease) {
            Some(ease) => Some(self.schedule(
                TweenProperty::Move,
                MoveTween::to(self.actor.clone(), dest),
                ease,
                cancel_prev,
            )),
            None => {
                self.immediate(TweenProperty::Move, cancel_prev);
                self.set_position(dest);
                None
            }
        }
    }

    /// Move along `path`. An immediate call jumps to `path(1.0)`.
    pub fn tween_path<F>(&self, mut path: F, ease: Option<&Ease>, cancel_prev: bool) -> Option<ActionRef>
    where
        F: FnMut(f32) -> Vector3<f32> + Send + 'static,
    {
        match scheduled(ease) {
            Some(ease) => Some(self.schedule(
                TweenProperty::Move,
                PathTween::new(self.actor.clone(), path),
                ease,
                cancel_prev,
            )),
            None => {
                self.immediate(TweenProperty::Move, cancel_prev);
                self.set_position(path(1.0));
                None
            }
        }
    }

    pub fn tween_scale(
        &self,
        dest: Vector3<f32>,
        ease: Option<&Ease>,
        cancel_prev: bool,
    ) -> Option<ActionRef> {
        match scheduled(ease) {
            Some(ease) => Some(self.schedule(
                TweenProperty::Scale,
                ScaleTween::to(self.actor.clone(), dest),
                ease,
                cancel_prev,
            )),
            None => {
                self.immediate(TweenProperty::Scale, cancel_prev);
                self.set_scale(dest);
                None
            }
        }
    }

    pub fn tween_rotation(
        &self,
        dest: UnitQuaternion<f32>,
        ease: Option<&Ease>,
        cancel_prev: bool,
    ) -> Option<ActionRef> {
        match scheduled(ease) {
            Some(ease) => Some(self.schedule(
                TweenProperty::Rotate,
                RotateTween::to(self.actor.clone(), dest),
                ease,
                cancel_prev,
            )),
            None => {
                self.immediate(TweenProperty::Rotate, cancel_prev);
                self.set_rotation(dest);
                None
            }
        }
    }

    pub fn tween_color(
        &self,
        dest: Vector4<f32>,
        ease: Option<&Ease>,
        cancel_prev: bool,
    ) -> Option<ActionRef> {
        match scheduled(ease) {
            Some(ease) => Some(self.schedule(
                TweenProperty::Color,
                ColorTween::to(self.actor.clone(), dest),
                ease,
                cancel_prev,
            )),
            None => {
                self.immediate(TweenProperty::Color, cancel_prev);
                self.set_color(dest);
                None
            }
        }
    }

    /// Schedule a caller-built action in `property`'s slot list
    pub fn tween_action(&self, property: TweenProperty, action: ActionRef, cancel_prev: bool) {
        self.slots.lock()[property.index()].insert(action.clone(), cancel_prev, self.slot_capacity);
        self.exec.add_action(action);
    }

    /// Cancel in-flight tweens on every property
    pub fn cancel_tweens(&self) {
        let mut slots = self.slots.lock();
        for slot in slots.iter_mut() {
            slot.cancel_all(self.slot_release_capacity);
        }
    }

    /// Cancel in-flight tweens on one property
    pub fn cancel(&self, property: TweenProperty) {
        self.slots.lock()[property.index()].cancel_all(self.slot_release_capacity);
    }

    /// Entries currently held for `property`. Completed actions are only
    /// culled on the next insert.
    pub fn in_flight(&self, property: TweenProperty) -> usize {
        self.slots.lock()[property.index()].len()
    }

    /// Logical slot capacity for `property`
    pub fn slot_capacity(&self, property: TweenProperty) -> usize {
        self.slots.lock()[property.index()].capacity()
    }

    fn schedule(
        &self,
        property: TweenProperty,
        tween: impl Tween + 'static,
        ease: &Ease,
        cancel_prev: bool,
    ) -> ActionRef {
        let mut slots = self.slots.lock();
        let action = self.exec.add_tween(tween, ease);
        slots[property.index()].insert(action.clone(), cancel_prev, self.slot_capacity);
        action
    }

    fn immediate(&self, property: TweenProperty, cancel_prev: bool) {
        if cancel_prev {
            self.cancel(property);
        }
    }
}

/// The ease to schedule with, or `None` for the synchronous path
#[inline]
fn scheduled(ease: Option<&Ease>) -> Option<&Ease> {
    ease.filter(|ease| !ease.is_immediate())
}
