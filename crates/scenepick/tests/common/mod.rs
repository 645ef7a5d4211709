//! Shared fixtures for the scenepick integration tests.
//!
//! Scenes use a 1000x800 viewport. The default test camera is a moving-eye
//! perspective camera whose field of view puts the eye at `z = -1000`, with
//! the near clip at the eye.

#![allow(dead_code)]

use scenepick::*;

pub const WIDTH: f64 = 1000.0;
pub const HEIGHT: f64 = 800.0;

/// Field of view that places the eye 1000 units in front of the viewport.
pub const FOV_1000: f64 = 43.602_818_97;

/// Eye distance of the default camera for the test viewport.
pub const PARALLEL_DISTANCE: f64 = 1492.820_323;

pub const EPS: f64 = 1e-4;

pub fn perspective(fixed_eye: bool) -> Camera {
    Camera::perspective(fixed_eye)
        .with_field_of_view(FOV_1000)
        .with_clips(0.0, 100.0)
}

/// A scene graph with a root group.
pub struct TestScene {
    pub graph: SceneGraph,
    pub root: NodeId,
}

impl TestScene {
    pub fn new() -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(Node::group());
        Self { graph, root }
    }

    /// Adds `node` as the topmost child of the root.
    pub fn add(&mut self, node: Node) -> NodeId {
        self.graph.add_child_node(self.root, node).unwrap()
    }

    /// Adds `node` as the topmost child of `parent`.
    pub fn add_to(&mut self, parent: NodeId, node: Node) -> NodeId {
        self.graph.add_child_node(parent, node).unwrap()
    }

    /// Picks with a perspective camera moved so that the ray runs straight
    /// along `+z` from `(x, y, -1000)` with a length of 1000 per unit `t`.
    pub fn pick_straight(&self, x: f64, y: f64, depth_buffer: bool) -> PickResult {
        self.pick_straight_through(perspective(false), x, y, depth_buffer)
    }

    /// Like [`TestScene::pick_straight`], with `camera` placed at the eye.
    pub fn pick_straight_through(
        &self,
        camera: Camera,
        x: f64,
        y: f64,
        depth_buffer: bool,
    ) -> PickResult {
        let mut graph = self.graph.clone();
        let camera = graph
            .add_child_node(
                self.root,
                Node::camera(camera).with_translation(
                    x - WIDTH / 2.0,
                    y - HEIGHT / 2.0,
                    0.0,
                ),
            )
            .unwrap();
        let options = SceneOptions::new(WIDTH, HEIGHT).with_depth_buffer(depth_buffer);
        Scene::new(graph, self.root, options)
            .unwrap()
            .with_camera(camera)
            .unwrap()
            .pick(WIDTH / 2.0, HEIGHT / 2.0)
    }

    /// Picks viewport pixel `(x, y)` through `camera`, or the default camera.
    pub fn pick_with(
        &self,
        camera: Option<Camera>,
        x: f64,
        y: f64,
        depth_buffer: bool,
    ) -> PickResult {
        let mut graph = self.graph.clone();
        let camera = camera.map(|c| graph.add_node(Node::camera(c)));
        let mut scene = Scene::new(
            graph,
            self.root,
            SceneOptions::new(WIDTH, HEIGHT).with_depth_buffer(depth_buffer),
        )
        .unwrap();
        scene.set_camera(camera).unwrap();
        scene.pick(x, y)
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.graph.node_mut(id).unwrap()
    }
}

pub fn rotated(node: Node, axis: DVec3, degrees: f64) -> Node {
    let transform = node.transform.clone().with_rotation(axis, degrees);
    node.with_transform(transform)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_point(actual: DVec3, expected: DVec3) {
    assert!(
        (actual - expected).length() < EPS,
        "expected {expected}, got {actual}"
    );
}

/// Checks node, local point, distance, face and texture coordinate of a hit.
pub fn assert_hit(
    result: &PickResult,
    node: NodeId,
    point: DVec3,
    distance: f64,
    face: Option<usize>,
    tex_coord: Option<DVec2>,
) {
    assert_eq!(result.node, Some(node), "picked {:?}", result);
    assert_point(result.point, point);
    assert_close(result.distance, distance);
    assert_eq!(result.face, face);
    match (result.tex_coord, tex_coord) {
        (Some(actual), Some(expected)) => assert!(
            (actual - expected).length() < EPS,
            "expected tex {expected}, got {actual}"
        ),
        (actual, expected) => assert_eq!(actual, expected),
    }
}

pub fn test_box() -> Node {
    Node::shape(Cuboid::new(100.0, 200.0, 400.0).unwrap())
}

pub fn test_sphere() -> Node {
    Node::shape(Sphere::new(100.0).unwrap())
}

pub fn test_cylinder() -> Node {
    Node::shape(Cylinder::new(50.0, 200.0).unwrap())
}

pub fn test_rect() -> Node {
    Node::shape(Rectangle::new(0.0, 0.0, 100.0, 100.0).unwrap())
}
