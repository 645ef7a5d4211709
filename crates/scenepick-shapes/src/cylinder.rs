//! Capped cylinder centred at the origin, with its axis along y.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};
use scenepick_core::{Aabb, Candidate, CullFace, PickRay, Result, ScenePickError};

use crate::convex;
use crate::mesh::TriangleMesh;
use crate::sphere::DEFAULT_DIVISIONS;
use crate::tessellation;

/// Which part of the cylinder bounds the ray interval at one end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Lateral,
    Cap,
}

/// A cylinder of the given radius and height.
///
/// The top cap lies at `y = -height / 2`, the bottom cap at `y = height / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    radius: f64,
    height: f64,
    divisions: u32,
    rough: Option<TriangleMesh>,
}

impl Default for Cylinder {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 2.0,
            divisions: DEFAULT_DIVISIONS,
            rough: None,
        }
    }
}

impl Cylinder {
    /// Creates a smooth cylinder.
    pub fn new(radius: f64, height: f64) -> Result<Self> {
        Self::with_divisions(radius, height, DEFAULT_DIVISIONS)
    }

    /// Creates a cylinder with the given number of divisions around its axis.
    pub fn with_divisions(radius: f64, height: f64, divisions: u32) -> Result<Self> {
        if !radius.is_finite() || !height.is_finite() || radius < 0.0 || height < 0.0 {
            return Err(ScenePickError::InvalidGeometry(format!(
                "cylinder dimensions must be finite and non-negative, got r={radius} h={height}"
            )));
        }
        let divisions = divisions.max(3);
        let rough = (divisions < DEFAULT_DIVISIONS)
            .then(|| tessellation::cylinder(radius, height, divisions))
            .transpose()?;
        Ok(Self {
            radius,
            height,
            divisions,
            rough,
        })
    }

    /// Returns the radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.height
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
        Aabb::centered(DVec3::new(2.0 * self.radius, self.height, 2.0 * self.radius))
    }

    /// Intersects a local-space ray with the cylinder.
    pub fn intersect(&self, ray: &PickRay, cull: CullFace) -> Option<Candidate> {
        if let Some(mesh) = &self.rough {
            return mesh.intersect(ray, cull).map(|c| Candidate { face: None, ..c });
        }

        let (o, d) = (ray.origin, ray.direction);
        let r = self.radius;
        let half = self.height / 2.0;

        // Interval inside the infinite lateral surface.
        let a = d.x * d.x + d.z * d.z;
        let (lat_enter, lat_exit) = if a == 0.0 {
            if o.x * o.x + o.z * o.z > r * r {
                return None;
            }
            (f64::NEG_INFINITY, f64::INFINITY)
        } else {
            let b = 2.0 * (o.x * d.x + o.z * d.z);
            let c = o.x * o.x + o.z * o.z - r * r;
            let discriminant = b * b - 4.0 * a * c;
            if discriminant < 0.0 {
                return None;
            }
            let root = discriminant.sqrt();
            ((-b - root) / (2.0 * a), (-b + root) / (2.0 * a))
        };

        // Interval between the caps.
        let (cap_enter, cap_exit) = if d.y == 0.0 {
            if o.y < -half || o.y > half {
                return None;
            }
            (f64::NEG_INFINITY, f64::INFINITY)
        } else {
            let t0 = (-half - o.y) / d.y;
            let t1 = (half - o.y) / d.y;
            (t0.min(t1), t0.max(t1))
        };

        let (t_enter, enter_surface) = if cap_enter > lat_enter {
            (cap_enter, Surface::Cap)
        } else {
            (lat_enter, Surface::Lateral)
        };
        let (t_exit, exit_surface) = if cap_exit < lat_exit {
            (cap_exit, Surface::Cap)
        } else {
            (lat_exit, Surface::Lateral)
        };

        let (t, side) = convex::resolve(ray, t_enter, t_exit, cull)?;
        let surface = if t == t_enter {
            enter_surface
        } else {
            exit_surface
        };
        let point = ray.at(t);
        let (tex, normal) = self.surface_attributes(surface, point);
        Some(
            Candidate::new(t, point, side)
                .with_tex_coord(tex)
                .with_normal(normal),
        )
    }

    fn surface_attributes(&self, surface: Surface, p: DVec3) -> (DVec2, DVec3) {
        let r = self.radius;
        match surface {
            Surface::Lateral => {
                let v = if self.height == 0.0 {
                    0.5
                } else {
                    0.5 + p.y / self.height
                };
                (
                    DVec2::new(0.5 + p.x.atan2(-p.z) / TAU, v),
                    DVec3::new(p.x, 0.0, p.z),
                )
            }
            Surface::Cap => {
                let (sx, sz) = if r == 0.0 {
                    (0.0, 0.0)
                } else {
                    (p.x / (2.0 * r), p.z / (2.0 * r))
                };
                if p.y < 0.0 {
                    (DVec2::new(0.5 + sx, 0.5 - sz), DVec3::NEG_Y)
                } else {
                    (DVec2::new(0.5 + sx, 0.5 + sz), DVec3::Y)
                }
            }
        }
    }
}
