//! Ray intersectors for scenepick shapes.
//!
//! Every intersector takes a ray already expressed in the shape's local
//! space and returns at most one [`Candidate`]:
//! - [`Cuboid`], [`Sphere`] and [`Cylinder`] solve their closed solids
//!   analytically (or against a tessellation for low division counts)
//! - [`TriangleMesh`] tests every face
//! - [`Planar`] shapes are tested where the ray meets `z = 0`
//!
//! [`Candidate`]: scenepick_core::Candidate

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Geometry code compares against exact sentinel values such as 0.0
#![allow(clippy::float_cmp)]
// Variable names follow the usual geometry notation
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod convex;
pub mod cuboid;
pub mod cylinder;
pub mod mesh;
pub mod planar;
pub mod sphere;
pub mod tessellation;

pub use cuboid::Cuboid;
pub use cylinder::Cylinder;
pub use mesh::{ray_intersect_triangle, MeshFace, TriangleHit, TriangleMesh, VertexFormat};
pub use planar::{Circle, Ellipse, FillRule, Planar, Polygon, Rectangle};
pub use sphere::{Sphere, DEFAULT_DIVISIONS};

use scenepick_core::{Aabb, Candidate, CullFace, PickRay};

/// Geometry attached to a shape node.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Cuboid(Cuboid),
    Sphere(Sphere),
    Cylinder(Cylinder),
    Mesh(TriangleMesh),
    Planar(Planar),
}

impl Shape {
    /// Intersects a local-space ray with the geometry.
    ///
    /// `cull` is ignored by planar shapes.
    pub fn intersect(&self, ray: &PickRay, cull: CullFace) -> Option<Candidate> {
        match self {
            Shape::Cuboid(s) => s.intersect(ray, cull),
            Shape::Sphere(s) => s.intersect(ray, cull),
            Shape::Cylinder(s) => s.intersect(ray, cull),
            Shape::Mesh(s) => s.intersect(ray, cull),
            Shape::Planar(s) => s.intersect(ray),
        }
    }

    /// Local bounds of the geometry.
    pub fn bounds(&self) -> Aabb {
        match self {
            Shape::Cuboid(s) => s.bounds(),
            Shape::Sphere(s) => s.bounds(),
            Shape::Cylinder(s) => s.bounds(),
            Shape::Mesh(s) => s.bounds(),
            Shape::Planar(s) => s.bounds(),
        }
    }

    /// Intersects a local-space ray with the geometry's bounds only.
    pub fn pick_bounds(&self, ray: &PickRay) -> Option<Candidate> {
        convex::pick_bounds(&self.bounds(), ray)
    }

    /// Short name of the geometry kind, used in log messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Cuboid(_) => "box",
            Shape::Sphere(_) => "sphere",
            Shape::Cylinder(_) => "cylinder",
            Shape::Mesh(_) => "mesh",
            Shape::Planar(Planar::Rectangle(_)) => "rectangle",
            Shape::Planar(Planar::Circle(_)) => "circle",
            Shape::Planar(Planar::Ellipse(_)) => "ellipse",
            Shape::Planar(Planar::Polygon(_)) => "polygon",
        }
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Shape {
                fn from(shape: $ty) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

impl_from_shape!(
    Cuboid(Cuboid),
    Sphere(Sphere),
    Cylinder(Cylinder),
    Mesh(TriangleMesh),
    Planar(Planar),
);

impl From<Rectangle> for Shape {
    fn from(shape: Rectangle) -> Self {
        Shape::Planar(shape.into())
    }
}

impl From<Circle> for Shape {
    fn from(shape: Circle) -> Self {
        Shape::Planar(shape.into())
    }
}

impl From<Ellipse> for Shape {
    fn from(shape: Ellipse) -> Self {
        Shape::Planar(shape.into())
    }
}

impl From<Polygon> for Shape {
    fn from(shape: Polygon) -> Self {
        Shape::Planar(shape.into())
    }
}
