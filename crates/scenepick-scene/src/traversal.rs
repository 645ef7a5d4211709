//! Depth-first pick traversal.
//!
//! Children are visited topmost first, so that without depth testing the
//! first hit is the visible one and the traversal can stop there.

use glam::DVec3;

use scenepick_core::{Candidate, NodeId, PickRay, SurfaceSide};

use crate::chooser::PickResultChooser;
use crate::graph::{Node, NodeKind, SceneGraph, SubScene};
use crate::walker;

/// Picks nodes of one scene graph.
///
/// Keeps track of the sub-scenes and clips currently being entered, so that
/// a graph referring back to itself is not entered twice.
#[derive(Debug)]
pub struct Traversal<'a> {
    graph: &'a SceneGraph,
    entered: Vec<NodeId>,
}

impl<'a> Traversal<'a> {
    pub fn new(graph: &'a SceneGraph) -> Self {
        Self {
            graph,
            entered: Vec::new(),
        }
    }

    /// Offers every hit in the subtree of `node` to `chooser`.
    ///
    /// `ray` is in the coordinates of `node`'s parent. `depth_buffer` tells
    /// whether the enclosing scene sorts by depth.
    pub fn pick(
        &mut self,
        node: NodeId,
        ray: &PickRay,
        depth_buffer: bool,
        chooser: &mut PickResultChooser,
    ) {
        if chooser.is_closed() || !self.graph.is_pick_candidate(node) {
            return;
        }
        self.visit(node, ray, depth_buffer, chooser);
    }

    fn visit(
        &mut self,
        id: NodeId,
        ray: &PickRay,
        depth_buffer: bool,
        chooser: &mut PickResultChooser,
    ) {
        let graph = self.graph;
        let Some(node) = graph.node(id) else {
            return;
        };
        let Some(local) = walker::to_local(graph, id, ray) else {
            return;
        };
        if let Some(clip) = node.clip {
            if !self.clip_admits(clip, &local) {
                log::trace!("{id} clipped out by {clip}");
                return;
            }
        }

        match &node.kind {
            NodeKind::Group => self.visit_group(id, node, &local, depth_buffer, chooser),
            NodeKind::Shape(shape) => {
                let candidate = if node.pick_on_bounds {
                    shape.pick_bounds(&local)
                } else {
                    shape.intersect(&local, node.cull_face)
                };
                if let Some(candidate) = candidate {
                    log::trace!("{id}: {} hit at t = {}", shape.kind_name(), candidate.t);
                    let has_depth_test = depth_buffer && graph.effective_depth_test(id);
                    chooser.offer(id, &candidate, local.distance(candidate.t), has_depth_test);
                }
            }
            NodeKind::SubScene(sub) => {
                self.visit_sub_scene(id, node, sub, &local, depth_buffer, chooser);
            }
            NodeKind::Camera(_) => {}
        }
    }

    fn visit_group(
        &mut self,
        id: NodeId,
        node: &Node,
        local: &PickRay,
        depth_buffer: bool,
        chooser: &mut PickResultChooser,
    ) {
        let Some(entry) = walker::bounds_entry(self.graph, id, local) else {
            return;
        };
        let distance = local.distance(entry.t);
        if !chooser.is_closer(distance) {
            log::trace!("{id}: bounds entry at {distance} is not closer than the held hit");
            return;
        }
        for child in self.graph.pick_order(id) {
            self.pick(child, local, depth_buffer, chooser);
            if chooser.is_closed() {
                return;
            }
        }
        if node.pick_on_bounds {
            let has_depth_test = depth_buffer && self.graph.effective_depth_test(id);
            chooser.offer(id, &entry, distance, has_depth_test);
        }
    }

    fn visit_sub_scene(
        &mut self,
        id: NodeId,
        node: &Node,
        sub: &SubScene,
        local: &PickRay,
        depth_buffer: bool,
        chooser: &mut PickResultChooser,
    ) {
        let Some(t) = local.plane_z0_t().filter(|&t| local.contains_t(t)) else {
            return;
        };
        let hit = local.at(t);
        let (x, y) = (hit.x, hit.y);
        if x < 0.0 || y < 0.0 || x > sub.width || y > sub.height {
            return;
        }
        let distance = local.distance(t);
        if !chooser.is_closer(distance) {
            return;
        }

        let inner_ray = match sub.camera {
            Some(camera_id) => {
                let Some(NodeKind::Camera(camera)) =
                    self.graph.node(camera_id).map(|n| &n.kind)
                else {
                    log::debug!("sub-scene {id}: camera {camera_id} is not a camera node");
                    return;
                };
                let local_to_scene = self.graph.local_to_scene(camera_id);
                match camera.pick_ray(x, y, sub.width, sub.height, &local_to_scene) {
                    Some(ray) => ray,
                    None => return,
                }
            }
            None => *local,
        };

        let mut inner = PickResultChooser::new();
        if self.enter(id) {
            self.pick(sub.root, &inner_ray, sub.depth_buffer, &mut inner);
            self.leave();
        }

        let has_depth_test = depth_buffer && self.graph.effective_depth_test(id);
        if let Some((inner_node, candidate, _)) = inner.held() {
            chooser.offer(inner_node, candidate, distance, has_depth_test);
        } else if sub.fill || node.pick_on_bounds {
            let candidate = Candidate::new(t, DVec3::new(x, y, 0.0), SurfaceSide::Front);
            chooser.offer(id, &candidate, distance, has_depth_test);
        }
    }

    /// Tests `local` against the clip node, which lives in the clipped
    /// node's coordinates. The clip itself need not be visible.
    fn clip_admits(&mut self, clip: NodeId, local: &PickRay) -> bool {
        if !self.enter(clip) {
            return false;
        }
        let mut chooser = PickResultChooser::new();
        self.visit(clip, local, false, &mut chooser);
        self.leave();
        !chooser.is_empty()
    }

    fn enter(&mut self, id: NodeId) -> bool {
        if self.entered.contains(&id) {
            log::debug!("{id} refers back to itself; not entering it again");
            return false;
        }
        self.entered.push(id);
        true
    }

    fn leave(&mut self) {
        self.entered.pop();
    }
}
