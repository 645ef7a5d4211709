//! Core value types for scenepick.
//!
//! This crate provides the types shared by the intersectors and the scene
//! traversal:
//! - [`PickRay`] with parametric near/far clipping
//! - [`NodeTransform`] for pivot-based node placement
//! - [`Aabb`] bounds and the slab ray test
//! - [`Candidate`] and [`PickResult`] intersection records
//! - Scene configuration options and the error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Geometry code compares against exact sentinel values such as 0.0
#![allow(clippy::float_cmp)]

pub mod bounds;
pub mod error;
pub mod options;
pub mod pick;
pub mod ray;
pub mod transform;

pub use bounds::{Aabb, SlabHit};
pub use error::{Result, ScenePickError};
pub use options::SceneOptions;
pub use pick::{Candidate, CullFace, DepthTest, NodeId, PickResult, SurfaceSide};
pub use ray::PickRay;
pub use transform::{try_inverse, NodeTransform};

// Re-export glam types for convenience
pub use glam::{DAffine3, DQuat, DVec2, DVec3};
