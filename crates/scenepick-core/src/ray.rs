//! Pick rays with parametric near/far clipping.

use glam::{DAffine3, DVec3};

/// A parametrized line `origin + t * direction` used for hit testing.
///
/// The direction is not normalized. Clip bounds are stored as ray parameters,
/// so they survive any invertible affine transform unchanged; the physical
/// clip distances in the current frame are `near_t * |direction|` and
/// `far_t * |direction|`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    /// Ray origin.
    pub origin: DVec3,
    /// Ray direction, not necessarily unit length.
    pub direction: DVec3,
    /// Smallest accepted ray parameter.
    pub near_t: f64,
    /// Largest accepted ray parameter.
    pub far_t: f64,
    /// Length of the direction in the frame the ray was created in.
    world_len: f64,
}

impl PickRay {
    /// Creates a ray in the frame that reported distances are measured in.
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3, near_t: f64, far_t: f64) -> Self {
        Self {
            origin,
            direction,
            near_t,
            far_t,
            world_len: direction.length(),
        }
    }

    /// Returns the point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Physical near clip distance in the current frame.
    #[must_use]
    pub fn near_clip(&self) -> f64 {
        self.near_t * self.direction.length()
    }

    /// Physical far clip distance in the current frame.
    #[must_use]
    pub fn far_clip(&self) -> f64 {
        self.far_t * self.direction.length()
    }

    /// Distance of parameter `t` measured in the ray's original frame.
    #[must_use]
    pub fn distance(&self, t: f64) -> f64 {
        t * self.world_len
    }

    /// Returns true if `t` lies within the clip range.
    #[must_use]
    pub fn contains_t(&self, t: f64) -> bool {
        t >= self.near_t && t <= self.far_t
    }

    /// Parameter where the ray crosses the `z = 0` plane, if it is not parallel to it.
    #[must_use]
    pub fn plane_z0_t(&self) -> Option<f64> {
        if self.direction.z == 0.0 {
            return None;
        }
        let t = -self.origin.z / self.direction.z;
        t.is_finite().then_some(t)
    }

    /// Maps the ray through `transform`.
    ///
    /// Parameters, and therefore clip bounds and reported distances, are
    /// unchanged by the mapping.
    #[must_use]
    pub fn transformed(&self, transform: &DAffine3) -> Self {
        Self {
            origin: transform.transform_point3(self.origin),
            direction: transform.transform_vector3(self.direction),
            near_t: self.near_t,
            far_t: self.far_t,
            world_len: self.world_len,
        }
    }

    /// Returns true if origin, direction and clips are all finite and the direction is non-zero.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite()
            && self.direction.is_finite()
            && self.direction != DVec3::ZERO
            && !self.near_t.is_nan()
            && !self.far_t.is_nan()
    }
}
