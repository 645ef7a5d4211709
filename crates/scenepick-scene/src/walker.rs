//! Moving pick rays between node coordinate spaces.

use glam::DVec3;

use scenepick_core::{try_inverse, Candidate, NodeId, PickRay, PickResult};
use scenepick_shapes::convex;

use crate::graph::SceneGraph;

/// Maps a ray from the parent's coordinates into `node`'s.
///
/// Returns `None` when the node's transform cannot be inverted; the node and
/// its subtree are then unpickable.
pub fn to_local(graph: &SceneGraph, node: NodeId, parent_ray: &PickRay) -> Option<PickRay> {
    let local_to_parent = graph.local_to_parent(node);
    match try_inverse(&local_to_parent) {
        Some(parent_to_local) => Some(parent_ray.transformed(&parent_to_local)),
        None => {
            log::debug!("skipping {node}: transform is not invertible");
            None
        }
    }
}

/// Maps a ray from the coordinates of `node`'s root into `node`'s.
pub fn scene_to_local(graph: &SceneGraph, node: NodeId, scene_ray: &PickRay) -> Option<PickRay> {
    let local_to_scene = graph.local_to_scene(node);
    try_inverse(&local_to_scene).map(|m| scene_ray.transformed(&m))
}

/// Where the part of `local_ray` between its clips enters the node's local
/// bounds, clamped to the near clip.
pub fn bounds_entry(graph: &SceneGraph, node: NodeId, local_ray: &PickRay) -> Option<Candidate> {
    convex::pick_bounds(&graph.local_bounds(node), local_ray)
}

/// The picked point of `result` in the coordinates of the picked node's root.
pub fn hit_point_in_scene(graph: &SceneGraph, result: &PickResult) -> Option<DVec3> {
    result
        .node
        .map(|node| graph.local_to_scene_point(node, result.point))
}
