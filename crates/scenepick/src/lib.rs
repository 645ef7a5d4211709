//! scenepick: a Rust-native 3D-aware picking engine for retained-mode scene graphs.
//!
//! Given a viewport position, scenepick finds the node a user is pointing
//! at, together with the hit point, its distance from the camera, and the
//! face, texture coordinate and normal at the hit.
//!
//! # Quick Start
//!
//! ```
//! use scenepick::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = SceneGraph::new();
//!     let root = graph.add_node(Node::group());
//!     let cube = graph.add_child_node(root, Node::shape(Cuboid::new(100.0, 200.0, 400.0)?))?;
//!
//!     let scene = Scene::new(graph, root, SceneOptions::new(1000.0, 800.0))?;
//!     let result = scene.pick(10.0, 40.0);
//!     assert_eq!(result.node, Some(cube));
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Scene`] builds a pick ray through its [`Camera`]
//! - the traversal walks the [`SceneGraph`] topmost node first, moving the
//!   ray into each node's local space
//! - each [`Shape`] intersects the local ray
//! - a [`PickResultChooser`] arbitrates between hits using the depth buffer
//!   and per-node depth test settings

// Re-export core types
pub use scenepick_core::{
    error::{Result, ScenePickError},
    options::SceneOptions,
    pick::{Candidate, CullFace, DepthTest, NodeId, PickResult, SurfaceSide},
    try_inverse, Aabb, NodeTransform, PickRay, DAffine3, DQuat, DVec2, DVec3,
};

// Re-export shapes
pub use scenepick_shapes::{
    Circle, Cuboid, Cylinder, Ellipse, FillRule, MeshFace, Planar, Polygon, Rectangle, Shape,
    Sphere, TriangleMesh, VertexFormat, DEFAULT_DIVISIONS,
};

// Re-export scene types
pub use scenepick_scene::{
    walker, Camera, Node, NodeKind, PickResultChooser, Projection, Scene, SceneGraph, SubScene,
    Traversal,
};

/// Initializes logging through `env_logger`.
///
/// Safe to call more than once; later calls leave the existing logger in place.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::info!("scenepick {} logging initialized", env!("CARGO_PKG_VERSION"));
}
