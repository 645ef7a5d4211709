//! Sphere centred at the origin.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};
use scenepick_core::{Aabb, Candidate, CullFace, PickRay, Result, ScenePickError};

use crate::convex;
use crate::mesh::TriangleMesh;
use crate::tessellation;

/// Number of divisions at which curved primitives are picked analytically.
pub const DEFAULT_DIVISIONS: u32 = 64;

/// A sphere of the given radius.
///
/// Spheres with fewer than [`DEFAULT_DIVISIONS`] divisions are picked against
/// their tessellation instead of the exact surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    radius: f64,
    divisions: u32,
    rough: Option<TriangleMesh>,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            radius: 1.0,
            divisions: DEFAULT_DIVISIONS,
            rough: None,
        }
    }
}

impl Sphere {
    /// Creates a smooth sphere.
    pub fn new(radius: f64) -> Result<Self> {
        Self::with_divisions(radius, DEFAULT_DIVISIONS)
    }

    /// Creates a sphere with the given number of divisions around its equator.
    pub fn with_divisions(radius: f64, divisions: u32) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ScenePickError::InvalidGeometry(format!(
                "sphere radius must be finite and non-negative, got {radius}"
            )));
        }
        let divisions = divisions.max(1);
        let rough = (divisions < DEFAULT_DIVISIONS)
            .then(|| tessellation::sphere(radius, divisions))
            .transpose()?;
        Ok(Self {
            radius,
            divisions,
            rough,
        })
    }

    /// Returns the radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the number of divisions.
    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    /// Returns true if picking uses the tessellated surface.
    pub fn is_rough(&self) -> bool {
        self.rough.is_some()
    }

    /// Local bounds.
    pub fn bounds(&self) -> Aabb {
        Aabb::centered(DVec3::splat(2.0 * self.radius))
    }

    /// Intersects a local-space ray with the sphere.
    pub fn intersect(&self, ray: &PickRay, cull: CullFace) -> Option<Candidate> {
        if let Some(mesh) = &self.rough {
            return mesh.intersect(ray, cull).map(|c| Candidate { face: None, ..c });
        }

        let r = self.radius;
        let a = ray.direction.length_squared();
        let b = 2.0 * ray.origin.dot(ray.direction);
        let c = ray.origin.length_squared() - r * r;
        let discriminant = b * b - 4.0 * a * c;
        if a == 0.0 || discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let t_enter = (-b - root) / (2.0 * a);
        let t_exit = (-b + root) / (2.0 * a);

        let (t, side) = convex::resolve(ray, t_enter, t_exit, cull)?;
        let point = ray.at(t);
        Some(
            Candidate::new(t, point, side)
                .with_tex_coord(spherical_tex_coord(point, r))
                .with_normal(point),
        )
    }
}

/// Maps a point on the sphere to texture space.
///
/// `u` runs around the y axis starting from the `-z` direction, `v` runs
/// along y.
fn spherical_tex_coord(p: DVec3, radius: f64) -> DVec2 {
    let v = if radius == 0.0 { 0.5 } else { 0.5 + p.y / (2.0 * radius) };
    DVec2::new(0.5 + p.x.atan2(-p.z) / TAU, v)
}
