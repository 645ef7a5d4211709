//! Axis-aligned box centred at the origin.

use glam::{DVec2, DVec3};
use scenepick_core::{Aabb, Candidate, CullFace, PickRay, Result, ScenePickError};

use crate::convex;

/// A box with the given full extents, centred at the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    size: DVec3,
}

impl Default for Cuboid {
    fn default() -> Self {
        Self {
            size: DVec3::splat(2.0),
        }
    }
}

impl Cuboid {
    /// Creates a box of the given width (x), height (y) and depth (z).
    pub fn new(width: f64, height: f64, depth: f64) -> Result<Self> {
        let size = DVec3::new(width, height, depth);
        if !size.is_finite() || size.min_element() < 0.0 {
            return Err(ScenePickError::InvalidGeometry(format!(
                "box dimensions must be finite and non-negative, got {size}"
            )));
        }
        Ok(Self { size })
    }

    /// Returns the full extents.
    pub fn size(&self) -> DVec3 {
        self.size
    }

    /// Local bounds.
    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.size)
    }

    /// Intersects a local-space ray with the box.
    pub fn intersect(&self, ray: &PickRay, cull: CullFace) -> Option<Candidate> {
        let hit = self.bounds().slab(ray)?;
        let (t, side) = convex::resolve(ray, hit.t_enter, hit.t_exit, cull)?;
        let axis = if t == hit.t_enter {
            hit.enter_axis
        } else {
            hit.exit_axis
        }?;
        let point = ray.at(t);
        let normal = face_normal(axis, point);
        Some(
            Candidate::new(t, point, side)
                .with_tex_coord(self.tex_coord(normal, point))
                .with_normal(normal),
        )
    }

    /// Texture coordinate on the face with outward `normal`.
    fn tex_coord(&self, normal: DVec3, p: DVec3) -> DVec2 {
        let DVec3 { x: w, y: h, z: d } = self.size;
        let ratio = |a: f64, b: f64| if b == 0.0 { 0.0 } else { a / b };
        if normal.z < 0.0 {
            DVec2::new(0.5 + ratio(p.x, w), 0.5 + ratio(p.y, h))
        } else if normal.z > 0.0 {
            DVec2::new(0.5 - ratio(p.x, w), 0.5 + ratio(p.y, h))
        } else if normal.y < 0.0 {
            DVec2::new(0.5 + ratio(p.x, w), 0.5 - ratio(p.z, d))
        } else if normal.y > 0.0 {
            DVec2::new(0.5 + ratio(p.x, w), 0.5 + ratio(p.z, d))
        } else if normal.x < 0.0 {
            DVec2::new(0.5 - ratio(p.z, d), 0.5 + ratio(p.y, h))
        } else {
            DVec2::new(0.5 + ratio(p.z, d), 0.5 + ratio(p.y, h))
        }
    }
}

/// Outward normal of the face on `axis` that contains `point`.
fn face_normal(axis: usize, point: DVec3) -> DVec3 {
    let mut n = DVec3::ZERO;
    n[axis] = if point[axis] < 0.0 { -1.0 } else { 1.0 };
    n
}
