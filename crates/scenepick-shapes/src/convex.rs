//! Hit selection for closed convex solids.
//!
//! A ray crosses a convex solid over a single interval `[t_enter, t_exit]`.
//! The entry is a front face and the exit a back face; which of the two is
//! reported depends on the clip range and the cull mode.

use scenepick_core::{Aabb, Candidate, CullFace, PickRay, SurfaceSide};

/// Picks the reported end of the interval `[t_enter, t_exit]`.
///
/// The entry is skipped when it lies before the near clip or front faces are
/// culled; the exit is then reported if it lies within the clips and back
/// faces are not culled.
pub fn resolve(
    ray: &PickRay,
    t_enter: f64,
    t_exit: f64,
    cull: CullFace,
) -> Option<(f64, SurfaceSide)> {
    if t_enter > t_exit {
        return None;
    }
    if t_enter < ray.near_t || cull == CullFace::Front {
        if ray.contains_t(t_exit) && cull != CullFace::Back {
            Some((t_exit, SurfaceSide::Back))
        } else {
            None
        }
    } else if t_enter > ray.far_t {
        None
    } else {
        Some((t_enter, SurfaceSide::Front))
    }
}

/// Intersects `ray` with `bounds` for bounds-only picking.
///
/// No culling applies. When the origin sits inside the box past the near
/// clip, the hit is reported at the near clip. The candidate carries neither
/// face, texture coordinate nor normal.
pub fn pick_bounds(bounds: &Aabb, ray: &PickRay) -> Option<Candidate> {
    let hit = bounds.slab(ray)?;
    let t = if hit.t_enter >= ray.near_t {
        hit.t_enter
    } else if hit.t_exit >= ray.near_t {
        ray.near_t
    } else {
        return None;
    };
    if t > ray.far_t {
        return None;
    }
    Some(Candidate::new(t, ray.at(t), SurfaceSide::Front))
}
