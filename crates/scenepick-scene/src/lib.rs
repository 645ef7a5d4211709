//! Scene graph and pick traversal for scenepick.
//!
//! A [`Scene`] turns a viewport position into a [`PickRay`] through its
//! camera, walks the [`SceneGraph`] topmost node first, and lets a
//! [`PickResultChooser`] decide which hit is reported.
//!
//! [`PickRay`]: scenepick_core::PickRay

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Geometry code compares against exact sentinel values such as 0.0
#![allow(clippy::float_cmp)]

pub mod camera;
pub mod chooser;
pub mod graph;
pub mod scene;
pub mod traversal;
pub mod walker;

pub use camera::{Camera, Projection};
pub use chooser::PickResultChooser;
pub use graph::{Node, NodeKind, SceneGraph, SubScene};
pub use scene::Scene;
pub use traversal::Traversal;
