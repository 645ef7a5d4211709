//! Property tests over randomly placed scenes.

mod common;

use common::*;
use proptest::prelude::*;
use scenepick::*;

fn placement() -> impl Strategy<Value = NodeTransform> {
    (
        (-300.0..300.0f64, -300.0..300.0f64, -300.0..300.0f64),
        (-1.0..1.0f64, -1.0..1.0f64, 0.1..1.0f64),
        -180.0..180.0f64,
        (0.2..5.0f64, 0.2..5.0f64, 0.2..5.0f64),
    )
        .prop_map(|((tx, ty, tz), (ax, ay, az), angle, (sx, sy, sz))| {
            NodeTransform::from_translation(DVec3::new(tx, ty, tz))
                .with_rotation(DVec3::new(ax, ay, az), angle)
                .with_scale(DVec3::new(sx, sy, sz))
        })
}

proptest! {
    #[test]
    fn prop_box_front_face_under_pixel(x in -49.0..49.0f64, y in -99.0..99.0f64) {
        let mut s = TestScene::new();
        let b = s.add(test_box());
        let r = s.pick_straight(x, y, true);
        prop_assert_eq!(r.node, Some(b));
        prop_assert!((r.point - DVec3::new(x, y, -200.0)).length() < EPS);
        prop_assert!((r.distance - 800.0).abs() < EPS);
    }

    #[test]
    fn prop_scene_point_round_trip(
        outer in placement(),
        inner in placement(),
        x in -50.0..50.0f64,
        y in -50.0..50.0f64,
        z in -50.0..50.0f64,
    ) {
        let mut s = TestScene::new();
        let group = s.add(Node::group().with_transform(outer));
        let b = s.add_to(group, test_box().with_transform(inner));
        let local = DVec3::new(x, y, z);
        let scene = s.graph.local_to_scene_point(b, local);
        let back = s.graph.scene_to_local_point(b, scene).unwrap();
        prop_assert!((back - local).length() < 1e-6);
    }

    #[test]
    fn prop_hit_lies_on_pick_ray(
        transform in placement(),
        x in -100.0..100.0f64,
        y in -100.0..100.0f64,
    ) {
        let mut s = TestScene::new();
        s.add(test_sphere().with_transform(transform));
        let r = s.pick_straight(x, y, true);
        if r.is_hit() {
            let p = walker::hit_point_in_scene(&s.graph, &r).unwrap();
            prop_assert!((p.x - x).abs() < 1e-6);
            prop_assert!((p.y - y).abs() < 1e-6);
            prop_assert!((r.distance - (p.z + 1000.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn prop_depth_buffer_picks_nearest(depths in prop::collection::vec(-500.0..500.0f64, 1..6)) {
        let mut s = TestScene::new();
        let ids: Vec<NodeId> = depths
            .iter()
            .map(|&z| s.add(test_box().with_translation(0.0, 0.0, z)))
            .collect();
        let r = s.pick_straight(10.0, 20.0, true);
        let (nearest, depth) = ids
            .iter()
            .zip(&depths)
            .rev()
            .fold(None, |best: Option<(NodeId, f64)>, (&id, &z)| match best {
                Some((_, held)) if held <= z => best,
                _ => Some((id, z)),
            })
            .unwrap();
        prop_assert_eq!(r.node, Some(nearest));
        prop_assert!((r.distance - (800.0 + depth)).abs() < EPS);

        let topmost = *ids.last().unwrap();
        prop_assert_eq!(s.pick_straight(10.0, 20.0, false).node, Some(topmost));
    }

    #[test]
    fn prop_rect_polygon_agree(x in -20.0..120.0f64, y in -20.0..120.0f64) {
        let rect = Rectangle::new(0.0, 0.0, 100.0, 100.0).unwrap();
        let polygon = Polygon::new(
            vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(100.0, 0.0),
                DVec2::new(100.0, 100.0),
                DVec2::new(0.0, 100.0),
            ],
            FillRule::EvenOdd,
        )
        .unwrap();
        let p = DVec2::new(x, y);
        prop_assert_eq!(rect.contains(p), polygon.contains(p));
    }
}
