//! Owned list of drawables re-sorted every frame.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use nalgebra::Matrix4;
use tracing::{debug, trace};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::sortable::DepthSortable;
use crate::sorter::{DepthSorter, SortOrder};
use crate::volume::Volume;
use crate::Result;

/// View and projection matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

impl FrameTransforms {
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        Self { view, projection }
    }

    /// Model to normalized device transform: `projection * view`
    #[inline]
    pub fn model_to_norm(&self) -> Matrix4<f32> {
        self.projection * self.view
    }
}

impl Default for FrameTransforms {
    fn default() -> Self {
        Self::new(Matrix4::identity(), Matrix4::identity())
    }
}

type DepthSortFn<T> = fn(&mut DepthSorter, &Matrix4<f32>, &mut [T]);
type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

enum SortMode<T> {
    Unsorted,
    Comparator(Comparator<T>),
    Depth {
        sorter: DepthSorter,
        sort: DepthSortFn<T>,
    },
}

/// Growable drawable list with a per-frame sort step.
///
/// Depth-sorted lists project, sort and cull on every [`update`](Self::update);
/// comparator lists sort with the comparator; unsorted lists keep insertion
/// order apart from the swap performed by removals.
pub struct RenderList<T> {
    items: Vec<T>,
    mode: SortMode<T>,
    model_to_norm: Matrix4<f32>,
    render_start: Option<usize>,
    render_stop: Option<usize>,
}

impl<T> RenderList<T> {
    fn with_mode(capacity: usize, mode: SortMode<T>) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            mode,
            model_to_norm: Matrix4::identity(),
            render_start: None,
            render_stop: None,
        }
    }

    /// List that is never reordered
    pub fn unsorted() -> Self {
        Self::with_mode(0, SortMode::Unsorted)
    }

    /// List sorted by `cmp` on every update
    pub fn with_comparator<F>(cmp: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self::with_mode(0, SortMode::Comparator(Box::new(cmp)))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(items);
    }

    /// Swap-remove the item at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        if index >= self.items.len() {
            return Err(RenderError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.swap_remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Transform used by the last update
    #[inline]
    pub fn model_to_norm(&self) -> &Matrix4<f32> {
        &self.model_to_norm
    }

    /// Set the model to normalized transform without sorting
    pub fn update_orientation(&mut self, frame: &FrameTransforms) {
        self.model_to_norm = frame.model_to_norm();
    }

    /// Refresh the transform from `frame`, then re-sort
    pub fn update(&mut self, frame: &FrameTransforms) {
        self.update_orientation(frame);
        self.update_sort();
    }

    /// Re-sort using the last transform
    pub fn update_sort(&mut self) {
        if self.items.is_empty() {
            self.render_start = None;
            self.render_stop = None;
            return;
        }
        match &mut self.mode {
            SortMode::Unsorted => {
                self.render_start = Some(0);
                self.render_stop = Some(self.items.len());
            }
            SortMode::Comparator(cmp) => {
                let cmp = &**cmp;
                self.items.sort_by(|a, b| cmp(a, b));
                self.render_start = Some(0);
                self.render_stop = Some(self.items.len());
            }
            SortMode::Depth { sorter, sort } => {
                sort(sorter, &self.model_to_norm, &mut self.items);
                self.render_start = sorter.start_index();
                self.render_stop = sorter.stop_index();
            }
        }
        trace!(
            len = self.items.len(),
            rendered = self.render_stop.unwrap_or(0) - self.render_start.unwrap_or(0),
            "render list sorted"
        );
    }

    #[inline]
    pub fn render_start_index(&self) -> Option<usize> {
        self.render_start
    }

    #[inline]
    pub fn render_stop_index(&self) -> Option<usize> {
        self.render_stop
    }

    #[inline]
    pub fn render_range(&self) -> Option<Range<usize>> {
        Some(self.render_start?..self.render_stop?)
    }

    /// Items inside the render range after the last update
    pub fn rendered(&self) -> &[T] {
        self.render_range()
            .and_then(|range| self.items.get(range))
            .unwrap_or(&[])
    }

    /// The depth sorter, if this list depth-sorts
    pub fn sorter(&self) -> Option<&DepthSorter> {
        match &self.mode {
            SortMode::Depth { sorter, .. } => Some(sorter),
            _ => None,
        }
    }
}

impl<T: PartialEq> RenderList<T> {
    /// Swap-remove the first item equal to `item`
    pub fn remove(&mut self, item: &T) -> bool {
        match self.items.iter().position(|x| x == item) {
            Some(index) => {
                self.items.swap_remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T: DepthSortable> RenderList<T> {
    /// List that depth-sorts and optionally culls on every update
    pub fn depth_sorted(order: SortOrder, cull: Option<Arc<dyn Volume>>) -> Self {
        Self::depth_sorted_with_capacity(0, order, cull)
    }

    pub fn depth_sorted_with_capacity(
        capacity: usize,
        order: SortOrder,
        cull: Option<Arc<dyn Volume>>,
    ) -> Self {
        Self::with_mode(
            capacity,
            SortMode::Depth {
                sorter: DepthSorter::new(order, cull),
                sort: DepthSorter::sort_with_transform::<T>,
            },
        )
    }

    /// Build a depth-sorted list from configuration
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            "render list: capacity={} order={:?} culling={}",
            config.initial_capacity,
            config.order,
            config.cull_volume.is_some()
        );
        let cull = config
            .cull_volume
            .map(|aabb| Arc::new(aabb) as Arc<dyn Volume>);
        Ok(Self::depth_sorted_with_capacity(
            config.initial_capacity,
            config.order,
            cull,
        ))
    }
}

impl<T> Default for RenderList<T> {
    fn default() -> Self {
        Self::unsorted()
    }
}

impl<T: fmt::Debug> fmt::Debug for RenderList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match &self.mode {
            SortMode::Unsorted => "unsorted",
            SortMode::Comparator(_) => "comparator",
            SortMode::Depth { .. } => "depth",
        };
        f.debug_struct("RenderList")
            .field("mode", &mode)
            .field("items", &self.items)
            .field("render_start", &self.render_start)
            .field("render_stop", &self.render_stop)
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a RenderList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
