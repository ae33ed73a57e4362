use std::sync::Arc;

use cadence_render::{
    Aabb, DepthItem, DepthSortable, DepthSorter, FrameTransforms, RenderConfig, RenderList,
    SortOrder, Volume,
};
use nalgebra::{Matrix4, Point3, Vector3};

fn ten_drawables() -> Vec<DepthItem<i32>> {
    // Five behind the origin plane, five in front; tagged with z * 10
    [-10, -8, -6, -4, -2, 2, 4, 6, 8, 10]
        .iter()
        .map(|&tag| DepthItem::at_norm(Vector3::new(0.0, 0.0, tag as f32 / 10.0), tag))
        .collect()
}

fn negative_half() -> Arc<dyn Volume> {
    Arc::new(Aabb::new([-1.0, -1.0, -1.0], [1.0, 1.0, 0.0]))
}

#[test]
fn back_to_front_with_negative_half_volume() {
    let mut items = ten_drawables();
    // Shuffle into a fixed non-sorted order
    items.swap(0, 9);
    items.swap(2, 5);
    items.swap(4, 7);

    let mut sorter = DepthSorter::back_to_front(Some(negative_half()));
    sorter.sort(&mut items);

    assert_eq!(sorter.start_index(), Some(0));
    assert_eq!(sorter.stop_index(), Some(5));
    let rendered: Vec<i32> = items[..5].iter().map(|i| i.value).collect();
    assert_eq!(rendered, vec![-2, -4, -6, -8, -10]);
    assert!(items[5..].iter().all(|i| i.norm_pos().z > 0.0));
}

#[test]
fn front_to_back_with_negative_half_volume() {
    let mut items = ten_drawables();
    items.reverse();
    let mut sorter = DepthSorter::front_to_back(Some(negative_half()));
    sorter.sort(&mut items);
    assert_eq!(sorter.render_range(), Some(0..5));
    let rendered: Vec<i32> = items[..5].iter().map(|i| i.value).collect();
    assert_eq!(rendered, vec![-10, -8, -6, -4, -2]);
}

#[test]
fn render_range_bounds_exactly_the_contained_subset() {
    let volume = Aabb::new([-0.5, -0.5, -1.0], [0.5, 0.5, 1.0]);
    let mut items: Vec<DepthItem<usize>> = (0..64)
        .map(|i| {
            let f = i as f32;
            let pos = Vector3::new((f * 0.37).sin(), (f * 0.91).cos(), (f * 0.13).sin());
            DepthItem::at_norm(pos, i)
        })
        .collect();
    let expected_inside = items
        .iter()
        .filter(|i| {
            let p = i.norm_pos();
            volume.contains(p.x, p.y, p.z)
        })
        .count();

    for order in [SortOrder::BackToFront, SortOrder::FrontToBack] {
        let mut sorter = DepthSorter::new(order, Some(Arc::new(volume)));
        sorter.sort(&mut items);
        let range = sorter.render_range().unwrap();
        assert_eq!(range, 0..expected_inside);
        for item in &items[range.clone()] {
            let p = item.norm_pos();
            assert!(volume.contains(p.x, p.y, p.z));
        }
        for item in &items[range.end..] {
            let p = item.norm_pos();
            assert!(!volume.contains(p.x, p.y, p.z));
        }
        for pair in items[range].windows(2) {
            let (a, b) = (pair[0].norm_pos().z, pair[1].norm_pos().z);
            match order {
                SortOrder::BackToFront => assert!(a >= b),
                SortOrder::FrontToBack => assert!(a <= b),
            }
        }
    }
}

#[test]
fn render_list_from_config_with_camera() {
    let mut list = RenderList::from_config(&RenderConfig::transparent()).unwrap();
    for (i, z) in [-2.0f32, -5.0, -50.0, 3.0, -10.0].into_iter().enumerate() {
        list.add(DepthItem::new(Vector3::new(0.0, 0.0, z), i));
    }

    let view = Matrix4::look_at_rh(
        &Point3::new(0.0, 0.0, 0.0),
        &Point3::new(0.0, 0.0, -1.0),
        &Vector3::y(),
    );
    let projection = Matrix4::new_perspective(1.0, std::f32::consts::FRAC_PI_2, 1.0, 20.0);
    list.update(&FrameTransforms::new(view, projection));

    // Behind the camera and past the far plane are culled; farthest first
    let rendered: Vec<usize> = list.rendered().iter().map(|i| i.value).collect();
    assert_eq!(rendered, vec![4, 1, 0]);
    assert_eq!(list.render_stop_index(), Some(3));
    assert_eq!(list.len(), 5);

    // Removing a rendered item and re-sorting with the same transform
    assert!(list.remove_at(0).is_ok());
    list.update_sort();
    let rendered: Vec<usize> = list.rendered().iter().map(|i| i.value).collect();
    assert_eq!(rendered.len(), 2);
}
