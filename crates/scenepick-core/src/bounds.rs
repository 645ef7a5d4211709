//! Axis-aligned bounding boxes and the slab ray test.

use glam::{DAffine3, DVec3};

use crate::ray::PickRay;

/// An axis-aligned bounding box. An empty box has `min > max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

/// Entry and exit of a ray through a box, with the axis of each crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabHit {
    /// Parameter where the ray enters the box.
    pub t_enter: f64,
    /// Axis index (0, 1, 2) of the plane crossed on entry, if any.
    pub enter_axis: Option<usize>,
    /// Parameter where the ray leaves the box.
    pub t_exit: f64,
    /// Axis index of the plane crossed on exit, if any.
    pub exit_axis: Option<usize>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    /// The empty box.
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    /// Creates a box from two corners in any order.
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box centred at the origin with the given full extents.
    #[must_use]
    pub fn centered(size: DVec3) -> Self {
        let half = size.abs() * 0.5;
        Self::new(-half, half)
    }

    /// Smallest box containing all `points`.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |acc, p| acc.union_point(p))
    }

    /// Returns true if the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Centre of the box, or the origin if it is empty.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    /// Full extents of the box.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Grows the box to include `point`.
    #[must_use]
    pub fn union_point(self, point: DVec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns true if `point` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Bounds of this box after mapping it through `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &DAffine3) -> Self {
        if self.is_empty() {
            return *self;
        }
        (0..8)
            .map(|i| {
                DVec3::new(
                    if i & 1 == 0 { self.min.x } else { self.max.x },
                    if i & 2 == 0 { self.min.y } else { self.max.y },
                    if i & 4 == 0 { self.min.z } else { self.max.z },
                )
            })
            .fold(Self::EMPTY, |acc, corner| {
                acc.union_point(transform.transform_point3(corner))
            })
    }

    /// Slab-method interval of `ray` through the box, ignoring clips.
    ///
    /// Returns `None` if the line misses the box entirely. Axes the ray runs
    /// parallel to only constrain the origin.
    #[must_use]
    pub fn slab(&self, ray: &PickRay) -> Option<SlabHit> {
        if self.is_empty() {
            return None;
        }
        let mut hit = SlabHit {
            t_enter: f64::NEG_INFINITY,
            enter_axis: None,
            t_exit: f64::INFINITY,
            exit_axis: None,
        };
        for axis in 0..3 {
            let o = ray.origin[axis];
            let d = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let (mut t0, mut t1) = ((lo - o) / d, (hi - o) / d);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > hit.t_enter {
                hit.t_enter = t0;
                hit.enter_axis = Some(axis);
            }
            if t1 < hit.t_exit {
                hit.t_exit = t1;
                hit.exit_axis = Some(axis);
            }
            if hit.t_enter > hit.t_exit {
                return None;
            }
        }
        Some(hit)
    }

    /// Returns true if the part of `ray` between its clips touches the box.
    #[must_use]
    pub fn intersects_clipped(&self, ray: &PickRay) -> bool {
        self.slab(ray)
            .is_some_and(|hit| hit.t_exit >= ray.near_t && hit.t_enter <= ray.far_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray_z(x: f64, y: f64) -> PickRay {
        PickRay::new(DVec3::new(x, y, -1000.0), DVec3::new(0.0, 0.0, 1000.0), 0.0, 100.0)
    }

    #[test]
    fn test_empty() {
        assert!(Aabb::EMPTY.is_empty());
        assert!(Aabb::from_points([]).is_empty());
        let b = Aabb::EMPTY.union(Aabb::centered(DVec3::ONE));
        assert_eq!(b, Aabb::centered(DVec3::ONE));
        assert!(Aabb::EMPTY.slab(&ray_z(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_slab_front_to_back() {
        let b = Aabb::centered(DVec3::new(100.0, 200.0, 400.0));
        let hit = b.slab(&ray_z(10.0, 40.0)).unwrap();
        assert!((hit.t_enter - 0.8).abs() < 1e-12);
        assert!((hit.t_exit - 1.2).abs() < 1e-12);
        assert_eq!(hit.enter_axis, Some(2));
        assert_eq!(hit.exit_axis, Some(2));
        assert!(b.slab(&ray_z(60.0, 0.0)).is_none());
    }

    #[test]
    fn test_flat_box() {
        // A planar shape's bounds have zero depth.
        let b = Aabb::new(DVec3::ZERO, DVec3::new(100.0, 100.0, 0.0));
        let hit = b.slab(&ray_z(50.0, 50.0)).unwrap();
        assert!((hit.t_enter - 1.0).abs() < 1e-12);
        assert!((hit.t_exit - 1.0).abs() < 1e-12);
        // Edges are inclusive.
        assert!(b.slab(&ray_z(0.0, 100.0)).is_some());
    }

    #[test]
    fn test_clipped_intersection() {
        let b = Aabb::centered(DVec3::splat(2.0));
        let mut ray = ray_z(0.0, 0.0);
        assert!(b.intersects_clipped(&ray));
        ray.far_t = 0.5;
        assert!(!b.intersects_clipped(&ray));
    }

    #[test]
    fn test_transformed_bounds() {
        let b = Aabb::centered(DVec3::new(100.0, 200.0, 400.0));
        let m = DAffine3::from_rotation_y(std::f64::consts::FRAC_PI_2);
        let t = b.transformed(&m);
        assert!((t.max.x - 200.0).abs() < 1e-9);
        assert!((t.max.z - 50.0).abs() < 1e-9);
        assert!((t.max.y - 100.0).abs() < 1e-9);
    }
}
