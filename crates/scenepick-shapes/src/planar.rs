//! Flat shapes lying in the local `z = 0` plane.
//!
//! Planar shapes have no thickness, so culling does not apply and hits carry
//! no face, texture coordinate or normal. Containment is inclusive: points on
//! the outline count as inside.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use scenepick_core::{Aabb, Candidate, PickRay, Result, ScenePickError, SurfaceSide};

/// Rule deciding which regions of a self-intersecting polygon are inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FillRule {
    /// Inside where the winding number is non-zero.
    #[default]
    NonZero,
    /// Inside where the winding number is odd.
    EvenOdd,
}

impl FillRule {
    /// Returns true if a point with winding number `winding` is filled.
    #[must_use]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

fn check_finite(what: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ScenePickError::InvalidGeometry(format!(
            "{what} parameters must be finite, got {values:?}"
        )))
    }
}

fn check_non_negative(what: &str, values: &[f64]) -> Result<()> {
    check_finite(what, values)?;
    if values.iter().any(|&v| v < 0.0) {
        return Err(ScenePickError::InvalidGeometry(format!(
            "{what} dimensions must be non-negative, got {values:?}"
        )));
    }
    Ok(())
}

/// Axis-aligned rectangle with optionally rounded corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Full horizontal diameter of the corner arcs.
    pub arc_width: f64,
    /// Full vertical diameter of the corner arcs.
    pub arc_height: f64,
}

impl Rectangle {
    /// Creates a rectangle with its top-left corner at `(x, y)`.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        check_finite("rectangle", &[x, y])?;
        check_non_negative("rectangle", &[width, height])?;
        Ok(Self {
            x,
            y,
            width,
            height,
            arc_width: 0.0,
            arc_height: 0.0,
        })
    }

    /// Rounds the corners with arcs of the given diameters.
    pub fn with_arcs(mut self, arc_width: f64, arc_height: f64) -> Result<Self> {
        check_non_negative("rectangle arc", &[arc_width, arc_height])?;
        self.arc_width = arc_width;
        self.arc_height = arc_height;
        Ok(self)
    }

    pub fn contains(&self, p: DVec2) -> bool {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.width, self.y + self.height);
        if p.x < x0 || p.x > x1 || p.y < y0 || p.y > y1 {
            return false;
        }
        let rx = (self.arc_width / 2.0).min(self.width / 2.0);
        let ry = (self.arc_height / 2.0).min(self.height / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return true;
        }

        // Only the corner squares need the ellipse test.
        let cx = if p.x < x0 + rx {
            x0 + rx
        } else if p.x > x1 - rx {
            x1 - rx
        } else {
            return true;
        };
        let cy = if p.y < y0 + ry {
            y0 + ry
        } else if p.y > y1 - ry {
            y1 - ry
        } else {
            return true;
        };
        inside_ellipse(p, DVec2::new(cx, cy), DVec2::new(rx, ry))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            DVec3::new(self.x, self.y, 0.0),
            DVec3::new(self.x + self.width, self.y + self.height, 0.0),
        )
    }
}

/// Circle centred at `center`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Result<Self> {
        check_finite("circle", &[center.x, center.y])?;
        check_non_negative("circle", &[radius])?;
        Ok(Self { center, radius })
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }

    pub fn bounds(&self) -> Aabb {
        let r = DVec2::splat(self.radius);
        Aabb::new(
            (self.center - r).extend(0.0),
            (self.center + r).extend(0.0),
        )
    }
}

/// Axis-aligned ellipse centred at `center`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ellipse {
    pub center: DVec2,
    pub radius: DVec2,
}

impl Ellipse {
    pub fn new(center: DVec2, radius_x: f64, radius_y: f64) -> Result<Self> {
        check_finite("ellipse", &[center.x, center.y])?;
        check_non_negative("ellipse", &[radius_x, radius_y])?;
        Ok(Self {
            center,
            radius: DVec2::new(radius_x, radius_y),
        })
    }

    pub fn contains(&self, p: DVec2) -> bool {
        inside_ellipse(p, self.center, self.radius)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            (self.center - self.radius).extend(0.0),
            (self.center + self.radius).extend(0.0),
        )
    }
}

/// Inclusive ellipse test. A degenerate ellipse contains only its own segment.
fn inside_ellipse(p: DVec2, center: DVec2, radius: DVec2) -> bool {
    let d = p - center;
    match (radius.x > 0.0, radius.y > 0.0) {
        (true, true) => {
            let n = d / radius;
            n.length_squared() <= 1.0
        }
        (true, false) => d.y == 0.0 && d.x.abs() <= radius.x,
        (false, true) => d.x == 0.0 && d.y.abs() <= radius.y,
        (false, false) => d == DVec2::ZERO,
    }
}

/// Closed polygon through `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<DVec2>,
    fill_rule: FillRule,
}

impl Polygon {
    /// Creates a polygon. The outline closes from the last point back to the first.
    pub fn new(points: Vec<DVec2>, fill_rule: FillRule) -> Result<Self> {
        if points.len() < 3 {
            return Err(ScenePickError::InvalidGeometry(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(ScenePickError::InvalidGeometry(format!(
                "polygon point {p} is not finite"
            )));
        }
        Ok(Self { points, fill_rule })
    }

    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        self.points
            .iter()
            .copied()
            .zip(self.points.iter().copied().cycle().skip(1))
    }

    /// Winding number of the outline around `p`.
    ///
    /// Crossings are counted half-open in y, so a vertex shared by two edges
    /// is counted once.
    pub fn winding_number(&self, p: DVec2) -> i32 {
        let mut winding = 0;
        for (a, b) in self.edges() {
            let side = (b - a).perp_dot(p - a);
            if a.y <= p.y {
                if b.y > p.y && side > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && side < 0.0 {
                winding -= 1;
            }
        }
        winding
    }

    pub fn contains(&self, p: DVec2) -> bool {
        self.edges().any(|(a, b)| on_segment(p, a, b))
            || self.fill_rule.is_inside(self.winding_number(p))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.points.iter().map(|p| p.extend(0.0)))
    }
}

fn on_segment(p: DVec2, a: DVec2, b: DVec2) -> bool {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p == a;
    }
    let cross = ab.perp_dot(p - a);
    let tolerance = 1e-9 * len2.max(1.0);
    if cross.abs() > tolerance {
        return false;
    }
    let along = ab.dot(p - a);
    (0.0..=len2).contains(&along)
}

/// Any flat shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Planar {
    Rectangle(Rectangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Polygon(Polygon),
}

impl Planar {
    /// Inclusive containment of a point in the shape's plane.
    pub fn contains(&self, p: DVec2) -> bool {
        match self {
            Planar::Rectangle(s) => s.contains(p),
            Planar::Circle(s) => s.contains(p),
            Planar::Ellipse(s) => s.contains(p),
            Planar::Polygon(s) => s.contains(p),
        }
    }

    /// Flat local bounds at `z = 0`.
    pub fn bounds(&self) -> Aabb {
        match self {
            Planar::Rectangle(s) => s.bounds(),
            Planar::Circle(s) => s.bounds(),
            Planar::Ellipse(s) => s.bounds(),
            Planar::Polygon(s) => s.bounds(),
        }
    }

    /// Intersects a local-space ray with the shape.
    pub fn intersect(&self, ray: &PickRay) -> Option<Candidate> {
        let t = ray.plane_z0_t()?;
        if !ray.contains_t(t) {
            return None;
        }
        let hit = ray.at(t);
        if !self.contains(hit.truncate()) {
            return None;
        }
        let side = if ray.direction.z > 0.0 {
            SurfaceSide::Front
        } else {
            SurfaceSide::Back
        };
        Some(Candidate::new(t, DVec3::new(hit.x, hit.y, 0.0), side))
    }
}

impl From<Rectangle> for Planar {
    fn from(shape: Rectangle) -> Self {
        Planar::Rectangle(shape)
    }
}

impl From<Circle> for Planar {
    fn from(shape: Circle) -> Self {
        Planar::Circle(shape)
    }
}

impl From<Ellipse> for Planar {
    fn from(shape: Ellipse) -> Self {
        Planar::Ellipse(shape)
    }
}

impl From<Polygon> for Planar {
    fn from(shape: Polygon) -> Self {
        Planar::Polygon(shape)
    }
}
