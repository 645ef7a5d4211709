//! Scene graph arena.
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. A node may
//! have at most one parent; nodes without a parent are roots. Besides the
//! scene root, detached roots are used as clip shapes and as the content of
//! sub-scenes.

use std::cmp::Ordering;

use glam::{DAffine3, DVec3};

use scenepick_core::{
    try_inverse, Aabb, CullFace, DepthTest, NodeId, NodeTransform, Result, ScenePickError,
};
use scenepick_shapes::Shape;

use crate::camera::Camera;

/// An embedded scene with its own viewport, camera and depth buffer.
///
/// The sub-scene occupies the rectangle `(0, 0)` to `(width, height)` in the
/// `z = 0` plane of its node. Its content is the detached tree under `root`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubScene {
    pub width: f64,
    pub height: f64,
    /// Root of the embedded content.
    pub root: NodeId,
    /// Camera node used to build rays into the content. Without one the
    /// incoming ray is carried through unchanged.
    pub camera: Option<NodeId>,
    /// Whether the content is depth sorted.
    pub depth_buffer: bool,
    /// Whether the sub-scene's background is pickable where no content is hit.
    pub fill: bool,
}

impl SubScene {
    /// Creates a sub-scene of the given size without camera, depth buffer or fill.
    pub fn new(width: f64, height: f64, root: NodeId) -> Self {
        Self {
            width,
            height,
            root,
            camera: None,
            depth_buffer: false,
            fill: false,
        }
    }

    #[must_use]
    pub fn with_camera(mut self, camera: NodeId) -> Self {
        self.camera = Some(camera);
        self
    }

    #[must_use]
    pub fn with_depth_buffer(mut self, depth_buffer: bool) -> Self {
        self.depth_buffer = depth_buffer;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    /// Local bounds: the viewport rectangle, flat at `z = 0`.
    pub fn bounds(&self) -> Aabb {
        Aabb::new(DVec3::ZERO, DVec3::new(self.width, self.height, 0.0))
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A container for child nodes.
    Group,
    /// A leaf with geometry.
    Shape(Shape),
    /// An embedded scene.
    SubScene(SubScene),
    /// A camera; never picked.
    Camera(Camera),
}

/// A scene graph node and its pick attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub transform: NodeTransform,
    pub depth_test: DepthTest,
    pub cull_face: CullFace,
    /// Pick against the local bounds instead of the exact geometry.
    pub pick_on_bounds: bool,
    pub visible: bool,
    pub mouse_transparent: bool,
    /// Children with a lower view order are on top of their siblings.
    pub view_order: f64,
    /// Detached node whose geometry limits where this node can be picked.
    pub clip: Option<NodeId>,
    pub name: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    /// Creates a node of the given kind with default attributes.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            transform: NodeTransform::default(),
            depth_test: DepthTest::default(),
            cull_face: CullFace::default(),
            pick_on_bounds: false,
            visible: true,
            mouse_transparent: false,
            view_order: 0.0,
            clip: None,
            name: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Creates an empty group.
    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    /// Creates a shape node.
    pub fn shape(shape: impl Into<Shape>) -> Self {
        Self::new(NodeKind::Shape(shape.into()))
    }

    /// Creates a sub-scene node.
    pub fn sub_scene(sub_scene: SubScene) -> Self {
        Self::new(NodeKind::SubScene(sub_scene))
    }

    /// Creates a camera node.
    pub fn camera(camera: Camera) -> Self {
        Self::new(NodeKind::Camera(camera))
    }

    #[must_use]
    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Shorthand for a translation-only transform.
    #[must_use]
    pub fn with_translation(mut self, x: f64, y: f64, z: f64) -> Self {
        self.transform.translation = DVec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_depth_test(mut self, depth_test: DepthTest) -> Self {
        self.depth_test = depth_test;
        self
    }

    #[must_use]
    pub fn with_cull_face(mut self, cull_face: CullFace) -> Self {
        self.cull_face = cull_face;
        self
    }

    #[must_use]
    pub fn with_pick_on_bounds(mut self, pick_on_bounds: bool) -> Self {
        self.pick_on_bounds = pick_on_bounds;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_mouse_transparent(mut self, mouse_transparent: bool) -> Self {
        self.mouse_transparent = mouse_transparent;
        self
    }

    #[must_use]
    pub fn with_view_order(mut self, view_order: f64) -> Self {
        self.view_order = view_order;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }
}

/// Arena of scene nodes.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node and returns its id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node {
            children: Vec::new(),
            parent: None,
            ..node
        });
        id
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Returns the node or a `NodeNotFound` error.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.node(id).ok_or(ScenePickError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.node_mut(id).ok_or(ScenePickError::NodeNotFound(id))
    }

    /// Adds `node` and appends it to `parent`'s children.
    pub fn add_child_node(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        if !self.get(parent)?.is_group() {
            return Err(ScenePickError::NotAGroup(parent));
        }
        let id = self.add_node(node);
        self.add_child(parent, id)?;
        Ok(id)
    }

    /// Appends `child` to `parent`'s children. Later children are on top.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_node = self.get(parent)?;
        if !parent_node.is_group() {
            return Err(ScenePickError::NotAGroup(parent));
        }
        if self.get(child)?.parent.is_some() {
            return Err(ScenePickError::AlreadyParented(child));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(ScenePickError::CycleDetected(child));
        }
        self.get_mut(parent)?.children.push(child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from `parent`. Returns false if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        self.get(child)?;
        let parent_node = self.get_mut(parent)?;
        let Some(pos) = parent_node.children.iter().position(|&c| c == child) else {
            return Ok(false);
        };
        parent_node.children.remove(pos);
        self.get_mut(child)?.parent = None;
        Ok(true)
    }

    /// Sets or clears the clip of `node`.
    ///
    /// A clip must be a detached node other than `node` itself; it is
    /// interpreted in `node`'s local coordinates.
    pub fn set_clip(&mut self, node: NodeId, clip: Option<NodeId>) -> Result<()> {
        self.get(node)?;
        if let Some(clip) = clip {
            let clip_node = self.get(clip)?;
            if clip == node
                || clip_node.parent.is_some()
                || self.ancestors(node).any(|a| a == clip)
            {
                return Err(ScenePickError::InvalidClip(clip));
            }
        }
        self.get_mut(node)?.clip = clip;
        Ok(())
    }

    /// `id` followed by its ancestors up to its root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |&n| self.node(n).and_then(|node| node.parent))
    }

    /// Returns true if the node can be hit: visible, not mouse transparent
    /// and not a camera.
    pub fn is_pick_candidate(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| {
            n.visible && !n.mouse_transparent && !matches!(n.kind, NodeKind::Camera(_))
        })
    }

    /// Resolves inherited depth testing. Enabled unless the nearest ancestor
    /// (or the node itself) that specifies a mode disables it.
    pub fn effective_depth_test(&self, id: NodeId) -> bool {
        self.ancestors(id)
            .filter_map(|a| self.node(a))
            .find(|n| n.depth_test != DepthTest::Inherit)
            .map_or(true, |n| n.depth_test == DepthTest::Enable)
    }

    /// Bounds of the node's content in its own coordinates.
    ///
    /// Groups cover their visible children as placed in the group. Cameras
    /// and unknown ids have empty bounds.
    pub fn local_bounds(&self, id: NodeId) -> Aabb {
        let Some(node) = self.node(id) else {
            return Aabb::EMPTY;
        };
        match &node.kind {
            NodeKind::Shape(shape) => shape.bounds(),
            NodeKind::SubScene(sub) => sub.bounds(),
            NodeKind::Camera(_) => Aabb::EMPTY,
            NodeKind::Group => node
                .children
                .iter()
                .filter(|&&c| self.node(c).is_some_and(|n| n.visible))
                .fold(Aabb::EMPTY, |acc, &c| acc.union(self.bounds_in_parent(c))),
        }
    }

    /// The node's bounds as placed in its parent.
    ///
    /// Walks the subtree once; the pivot reuses the bounds just computed.
    fn bounds_in_parent(&self, id: NodeId) -> Aabb {
        let Some(node) = self.node(id) else {
            return Aabb::EMPTY;
        };
        let bounds = self.local_bounds(id);
        let pivot = if node.transform.uses_pivot() {
            bounds.center()
        } else {
            DVec3::ZERO
        };
        bounds.transformed(&node.transform.local_to_parent(pivot))
    }

    /// Transform from the node's coordinates to its parent's.
    ///
    /// Rotation and scale pivot around the centre of the local bounds.
    pub fn local_to_parent(&self, id: NodeId) -> DAffine3 {
        let Some(node) = self.node(id) else {
            return DAffine3::IDENTITY;
        };
        let pivot = if node.transform.uses_pivot() {
            self.local_bounds(id).center()
        } else {
            DVec3::ZERO
        };
        node.transform.local_to_parent(pivot)
    }

    /// Transform from the node's coordinates to those of its root.
    pub fn local_to_scene(&self, id: NodeId) -> DAffine3 {
        self.ancestors(id)
            .fold(DAffine3::IDENTITY, |acc, a| self.local_to_parent(a) * acc)
    }

    /// Transform from the node's coordinates to those of `ancestor`.
    ///
    /// Returns `None` if `ancestor` is not `id` or one of its ancestors.
    pub fn local_to_ancestor(&self, id: NodeId, ancestor: NodeId) -> Option<DAffine3> {
        let mut acc = DAffine3::IDENTITY;
        for a in self.ancestors(id) {
            if a == ancestor {
                return Some(acc);
            }
            acc = self.local_to_parent(a) * acc;
        }
        None
    }

    /// Maps a point from the node's coordinates to its root's.
    pub fn local_to_scene_point(&self, id: NodeId, point: DVec3) -> DVec3 {
        self.local_to_scene(id).transform_point3(point)
    }

    /// Maps a point from the root's coordinates into the node's, if the
    /// transform chain is invertible.
    pub fn scene_to_local_point(&self, id: NodeId, point: DVec3) -> Option<DVec3> {
        try_inverse(&self.local_to_scene(id)).map(|m| m.transform_point3(point))
    }

    /// Maps a point from the node's coordinates to those of `ancestor`.
    pub fn local_to_ancestor_point(
        &self,
        id: NodeId,
        ancestor: NodeId,
        point: DVec3,
    ) -> Option<DVec3> {
        self.local_to_ancestor(id, ancestor)
            .map(|m| m.transform_point3(point))
    }

    /// Children of `id` in picking order, topmost first.
    ///
    /// Lower view order is on top; among equal view orders later children
    /// are on top.
    pub fn pick_order(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.node(id) else {
            return Vec::new();
        };
        let mut order: Vec<(usize, NodeId, f64)> = node
            .children
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| self.node(c).map(|n| (i, c, n.view_order)))
            .collect();
        order.sort_by(|a, b| {
            a.2.partial_cmp(&b.2)
                .unwrap_or(Ordering::Equal)
                .then(b.0.cmp(&a.0))
        });
        order.into_iter().map(|(_, c, _)| c).collect()
    }
}
