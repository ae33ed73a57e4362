//! Drawables that can be ordered by normalized depth.

use nalgebra::{Matrix4, Vector3, Vector4};

/// Something whose position can be projected into normalized device space.
///
/// The sorter calls [`update_norm_pos`](DepthSortable::update_norm_pos) once
/// per frame and then only reads [`norm_pos`](DepthSortable::norm_pos).
pub trait DepthSortable {
    /// Recompute the normalized position from a model to normalized transform
    fn update_norm_pos(&mut self, model_to_norm: &Matrix4<f32>);

    /// Position computed by the last update
    fn norm_pos(&self) -> Vector3<f32>;
}

impl<T: DepthSortable + ?Sized> DepthSortable for Box<T> {
    #[inline]
    fn update_norm_pos(&mut self, model_to_norm: &Matrix4<f32>) {
        (**self).update_norm_pos(model_to_norm)
    }

    #[inline]
    fn norm_pos(&self) -> Vector3<f32> {
        (**self).norm_pos()
    }
}

/// Project a model-space point, dividing by `w` when it is non-zero
#[inline]
pub fn project_point(model_to_norm: &Matrix4<f32>, pos: &Vector3<f32>) -> Vector3<f32> {
    let p = model_to_norm * Vector4::new(pos.x, pos.y, pos.z, 1.0);
    if p.w != 0.0 {
        Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
    } else {
        p.xyz()
    }
}

/// Ready-made sortable: a model-space anchor point plus a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthItem<T> {
    pub model_pos: Vector3<f32>,
    pub value: T,
    norm_pos: Vector3<f32>,
}

impl<T> DepthItem<T> {
    pub fn new(model_pos: Vector3<f32>, value: T) -> Self {
        Self {
            model_pos,
            value,
            norm_pos: model_pos,
        }
    }

    /// Item whose normalized position is given directly
    pub fn at_norm(norm_pos: Vector3<f32>, value: T) -> Self {
        Self {
            model_pos: norm_pos,
            value,
            norm_pos,
        }
    }
}

impl<T> DepthSortable for DepthItem<T> {
    #[inline]
    fn update_norm_pos(&mut self, model_to_norm: &Matrix4<f32>) {
        self.norm_pos = project_point(model_to_norm, &self.model_pos);
    }

    #[inline]
    fn norm_pos(&self) -> Vector3<f32> {
        self.norm_pos
    }
}
