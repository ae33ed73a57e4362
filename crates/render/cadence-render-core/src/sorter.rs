//! Depth sort and cull partition for a frame's drawables.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::sortable::DepthSortable;
use crate::volume::Volume;

/// Direction of the depth sort on normalized z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Largest z first. Required for alpha blending.
    #[default]
    BackToFront,
    /// Smallest z first. Minimizes overdraw for opaque geometry.
    FrontToBack,
}

impl SortOrder {
    /// Compare two depths in this order
    #[inline]
    pub fn compare(self, a: f32, b: f32) -> Ordering {
        match self {
            Self::BackToFront => b.total_cmp(&a),
            Self::FrontToBack => a.total_cmp(&b),
        }
    }
}

/// Sorts drawables by normalized depth and moves everything outside the
/// cull volume to the tail.
///
/// After each sort, `[start_index, stop_index)` covers exactly the drawables
/// inside the volume, or the whole batch when there is no volume. Culled
/// drawables stay in the slice past `stop_index`. The sort is stable.
#[derive(Clone)]
pub struct DepthSorter {
    order: SortOrder,
    cull: Option<Arc<dyn Volume>>,
    render_start: Option<usize>,
    render_stop: Option<usize>,
    // Scratch reused across frames
    keys: Vec<SortKey>,
    perm: Vec<usize>,
}

/// Per-item sort key, computed once per sort
#[derive(Debug, Clone, Copy)]
struct SortKey {
    inside: bool,
    z: f32,
    index: usize,
}

impl DepthSorter {
    pub fn new(order: SortOrder, cull: Option<Arc<dyn Volume>>) -> Self {
        Self {
            order,
            cull,
            render_start: None,
            render_stop: None,
            keys: Vec::new(),
            perm: Vec::new(),
        }
    }

    pub fn back_to_front(cull: Option<Arc<dyn Volume>>) -> Self {
        Self::new(SortOrder::BackToFront, cull)
    }

    pub fn front_to_back(cull: Option<Arc<dyn Volume>>) -> Self {
        Self::new(SortOrder::FrontToBack, cull)
    }

    #[inline]
    pub fn order(&self) -> SortOrder {
        self.order
    }

    #[inline]
    pub fn cull_bounds(&self) -> Option<&Arc<dyn Volume>> {
        self.cull.as_ref()
    }

    /// First rendered index, `None` before the first non-empty sort
    #[inline]
    pub fn start_index(&self) -> Option<usize> {
        self.render_start
    }

    /// One past the last rendered index
    #[inline]
    pub fn stop_index(&self) -> Option<usize> {
        self.render_stop
    }

    #[inline]
    pub fn render_range(&self) -> Option<Range<usize>> {
        Some(self.render_start?..self.render_stop?)
    }

    /// Project every item with `model_to_norm`, then sort
    pub fn sort_with_transform<T: DepthSortable>(&mut self, model_to_norm: &Matrix4<f32>, items: &mut [T]) {
        for item in items.iter_mut() {
            item.update_norm_pos(model_to_norm);
        }
        self.sort(items);
    }

    /// Sort on the normalized positions already stored in `items`.
    ///
    /// Containment and depth are read once per item. The key and
    /// permutation buffers are kept between calls, so a steady batch size
    /// sorts without allocating.
    pub fn sort<T: DepthSortable>(&mut self, items: &mut [T]) {
        if items.is_empty() {
            self.render_start = None;
            self.render_stop = None;
            return;
        }

        let cull = self.cull.as_deref();
        self.keys.clear();
        self.keys.extend(items.iter().enumerate().map(|(index, item)| {
            let p = item.norm_pos();
            SortKey {
                inside: cull.map_or(true, |volume| volume.contains(p.x, p.y, p.z)),
                z: p.z,
                index,
            }
        }));

        let order = self.order;
        // Index tiebreak keeps the unstable sort stable
        self.keys.sort_unstable_by(|a, b| {
            // Culled entries sort after everything that is kept
            b.inside
                .cmp(&a.inside)
                .then_with(|| order.compare(a.z, b.z))
                .then_with(|| a.index.cmp(&b.index))
        });

        self.perm.clear();
        self.perm.extend(self.keys.iter().map(|key| key.index));
        apply_permutation(items, &mut self.perm);

        self.render_start = Some(0);
        self.render_stop = Some(self.keys.partition_point(|key| key.inside));
    }
}

/// Reorder `items` so that position `i` holds the element previously at
/// `perm[i]`. Consumes `perm` by resetting each entry to its own index.
fn apply_permutation<T>(items: &mut [T], perm: &mut [usize]) {
    for i in 0..perm.len() {
        if perm[i] == i {
            continue;
        }
        let mut cur = i;
        loop {
            let src = perm[cur];
            perm[cur] = cur;
            if src == i {
                break;
            }
            items.swap(cur, src);
            cur = src;
        }
    }
}

impl fmt::Debug for DepthSorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepthSorter")
            .field("order", &self.order)
            .field("culling", &self.cull.is_some())
            .field("render_start", &self.render_start)
            .field("render_stop", &self.render_stop)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sortable::DepthItem;
    use crate::volume::Aabb;
    use nalgebra::Vector3;

    fn at_z(zs: &[f32]) -> Vec<DepthItem<usize>> {
        zs.iter()
            .enumerate()
            .map(|(i, &z)| DepthItem::at_norm(Vector3::new(0.0, 0.0, z), i))
            .collect()
    }

    fn zs(items: &[DepthItem<usize>]) -> Vec<f32> {
        items.iter().map(|item| item.norm_pos().z).collect()
    }

    #[test]
    fn back_to_front_without_culling() {
        let mut items = at_z(&[0.2, -0.5, 0.9, 0.0]);
        let mut sorter = DepthSorter::back_to_front(None);
        sorter.sort(&mut items);
        assert_eq!(zs(&items), vec![0.9, 0.2, 0.0, -0.5]);
        assert_eq!(sorter.render_range(), Some(0..4));
    }

    #[test]
    fn front_to_back_without_culling() {
        let mut items = at_z(&[0.2, -0.5, 0.9, 0.0]);
        let mut sorter = DepthSorter::front_to_back(None);
        sorter.sort(&mut items);
        assert_eq!(zs(&items), vec![-0.5, 0.0, 0.2, 0.9]);
    }

    #[test]
    fn culled_items_go_last_in_either_order() {
        let volume: Arc<dyn Volume> = Arc::new(Aabb::new([-1.0; 3], [1.0, 1.0, 0.5]));
        for order in [SortOrder::BackToFront, SortOrder::FrontToBack] {
            let mut items = at_z(&[0.9, 0.1, 0.7, -0.3, 0.4]);
            let mut sorter = DepthSorter::new(order, Some(volume.clone()));
            sorter.sort(&mut items);
            assert_eq!(sorter.stop_index(), Some(3));
            let kept = &zs(&items)[..3];
            let expected = match order {
                SortOrder::BackToFront => vec![0.4, 0.1, -0.3],
                SortOrder::FrontToBack => vec![-0.3, 0.1, 0.4],
            };
            assert_eq!(kept, expected.as_slice());
            assert!(items[3..].iter().all(|i| i.norm_pos().z > 0.5));
        }
    }

    #[test]
    fn equal_depths_keep_input_order() {
        let mut items = at_z(&[0.5, 0.5, 0.1, 0.5]);
        DepthSorter::back_to_front(None).sort(&mut items);
        let ids: Vec<usize> = items.iter().map(|i| i.value).collect();
        assert_eq!(ids, vec![0, 1, 3, 2]);
    }

    #[test]
    fn empty_batch_has_no_range() {
        let mut sorter = DepthSorter::back_to_front(Some(Arc::new(Aabb::ndc())));
        let mut items = at_z(&[0.0]);
        sorter.sort(&mut items);
        assert_eq!(sorter.render_range(), Some(0..1));
        sorter.sort::<DepthItem<usize>>(&mut []);
        assert_eq!(sorter.start_index(), None);
        assert_eq!(sorter.stop_index(), None);
    }

    #[test]
    fn permutation_follows_cycles() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        let mut perm = vec![2, 0, 1, 4, 3];
        apply_permutation(&mut items, &mut perm);
        assert_eq!(items, vec!['c', 'a', 'b', 'e', 'd']);
        assert_eq!(perm, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn scratch_is_reused_across_frames() {
        let volume: Arc<dyn Volume> = Arc::new(Aabb::ndc());
        let mut sorter = DepthSorter::front_to_back(Some(volume));
        let mut items = at_z(&[0.5, 3.0, -0.5, 0.1]);
        sorter.sort(&mut items);
        let capacity = (sorter.keys.capacity(), sorter.perm.capacity());

        for frame in 0..4 {
            let mut next = at_z(&[0.2 * frame as f32, -0.9, 2.0, 0.4]);
            sorter.sort(&mut next);
            assert_eq!(sorter.stop_index(), Some(3));
            assert!(next[..3].windows(2).all(|w| w[0].norm_pos().z <= w[1].norm_pos().z));
        }
        assert_eq!((sorter.keys.capacity(), sorter.perm.capacity()), capacity);
    }

    #[test]
    fn everything_culled() {
        let mut items = at_z(&[2.0, 3.0]);
        let mut sorter = DepthSorter::back_to_front(Some(Arc::new(Aabb::ndc())));
        sorter.sort(&mut items);
        assert_eq!(sorter.render_range(), Some(0..0));
    }

    #[test]
    fn nan_depths_do_not_panic() {
        let mut items = at_z(&[f32::NAN, 0.3, -0.2, f32::NAN]);
        let mut sorter = DepthSorter::front_to_back(Some(Arc::new(Aabb::ndc())));
        sorter.sort(&mut items);
        assert_eq!(sorter.stop_index(), Some(2));
    }

    #[test]
    fn sort_with_transform_projects_first() {
        let mut items = vec![
            DepthItem::new(Vector3::new(0.0, 0.0, 0.1), 'a'),
            DepthItem::new(Vector3::new(0.0, 0.0, 0.3), 'b'),
        ];
        let shift = Matrix4::new_translation(&Vector3::new(0.0, 0.0, -0.2));
        let mut sorter = DepthSorter::back_to_front(None);
        sorter.sort_with_transform(&shift, &mut items);
        assert_eq!(items[0].value, 'b');
        assert!((items[1].norm_pos().z + 0.1).abs() < 1e-6);
    }
}
