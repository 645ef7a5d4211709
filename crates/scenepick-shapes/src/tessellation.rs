//! Tessellation of curved primitives into triangle meshes.
//!
//! Vertices around the y axis sit at angles `-π + k * 2π / divisions`, so
//! with a multiple of four divisions they land on the x and z axes. Every
//! triangle is wound so that its normal points away from the shape's centre.

use std::f64::consts::{PI, TAU};

use glam::{DVec2, DVec3};
use scenepick_core::Result;

use crate::mesh::TriangleMesh;

/// Point on a circle of radius `rho` around the y axis at height `y`.
fn ring_point(rho: f64, y: f64, phi: f64) -> DVec3 {
    DVec3::new(rho * phi.sin(), y, -rho * phi.cos())
}

/// Collects faces, flipping any triangle whose normal points inwards.
struct FaceBuilder<'a> {
    points: &'a [DVec3],
    faces: Vec<[usize; 6]>,
}

impl<'a> FaceBuilder<'a> {
    fn new(points: &'a [DVec3]) -> Self {
        Self {
            points,
            faces: Vec::new(),
        }
    }

    /// Adds a triangle given as `(point, tex)` index pairs.
    fn push(&mut self, a: (usize, usize), b: (usize, usize), c: (usize, usize)) {
        let [pa, pb, pc] = [a.0, b.0, c.0].map(|i| self.points[i]);
        let normal = (pb - pa).cross(pc - pa);
        let (b, c) = if normal.dot(pa + pb + pc) < 0.0 {
            (c, b)
        } else {
            (b, c)
        };
        self.faces.push([a.0, a.1, b.0, b.1, c.0, c.1]);
    }
}

/// Tessellates a sphere with `divisions` segments around and half as many from pole to pole.
pub fn sphere(radius: f64, divisions: u32) -> Result<TriangleMesh> {
    let lon = divisions.max(3) as usize;
    let lat = (lon / 2).max(2);

    let mut points = Vec::with_capacity((lat + 1) * (lon + 1));
    let mut tex_coords = Vec::with_capacity(points.capacity());
    for j in 0..=lat {
        #[allow(clippy::cast_precision_loss)]
        let theta = PI * j as f64 / lat as f64;
        let (y, rho) = (-radius * theta.cos(), radius * theta.sin());
        for k in 0..=lon {
            #[allow(clippy::cast_precision_loss)]
            let u = k as f64 / lon as f64;
            points.push(ring_point(rho, y, -PI + TAU * u));
            tex_coords.push(DVec2::new(u, 0.5 - theta.cos() / 2.0));
        }
    }

    let at = |j: usize, k: usize| {
        let i = j * (lon + 1) + k;
        (i, i)
    };
    let mut builder = FaceBuilder::new(&points);
    for j in 0..lat {
        for k in 0..lon {
            if j != 0 {
                builder.push(at(j, k), at(j, k + 1), at(j + 1, k + 1));
            }
            if j != lat - 1 {
                builder.push(at(j, k), at(j + 1, k + 1), at(j + 1, k));
            }
        }
    }
    let faces = builder.faces;
    TriangleMesh::new(points, tex_coords, &faces)
}

/// Tessellates a capped cylinder along the y axis.
pub fn cylinder(radius: f64, height: f64, divisions: u32) -> Result<TriangleMesh> {
    let n = divisions.max(3) as usize;
    let half = height / 2.0;

    // Two lateral rings with a seam column, then the two cap centres.
    let mut points = Vec::with_capacity(2 * (n + 1) + 2);
    let mut tex_coords = Vec::with_capacity(4 * (n + 1) + 2);
    for (y, v) in [(-half, 0.0), (half, 1.0)] {
        for k in 0..=n {
            #[allow(clippy::cast_precision_loss)]
            let u = k as f64 / n as f64;
            points.push(ring_point(radius, y, -PI + TAU * u));
            tex_coords.push(DVec2::new(u, v));
        }
    }
    let top_center = points.len();
    points.push(DVec3::new(0.0, -half, 0.0));
    points.push(DVec3::new(0.0, half, 0.0));
    let bottom_center = top_center + 1;

    // Cap texture coordinates follow the ring points, then the centres.
    let cap_tex = |p: DVec3, top: bool| {
        let (sx, sz) = if radius == 0.0 {
            (0.0, 0.0)
        } else {
            (p.x / (2.0 * radius), p.z / (2.0 * radius))
        };
        DVec2::new(0.5 + sx, if top { 0.5 - sz } else { 0.5 + sz })
    };
    let top_tex = tex_coords.len();
    let (top_ring, bottom_ring) = points[..2 * (n + 1)].split_at(n + 1);
    tex_coords.extend(top_ring.iter().map(|&p| cap_tex(p, true)));
    let bottom_tex = tex_coords.len();
    tex_coords.extend(bottom_ring.iter().map(|&p| cap_tex(p, false)));
    let center_tex = tex_coords.len();
    tex_coords.push(DVec2::splat(0.5));

    let mut builder = FaceBuilder::new(&points);
    for k in 0..n {
        let (t0, t1) = (k, k + 1);
        let (b0, b1) = (n + 1 + k, n + 2 + k);
        builder.push((t0, t0), (t1, t1), (b1, b1));
        builder.push((t0, t0), (b1, b1), (b0, b0));
        builder.push((top_center, center_tex), (t0, top_tex + k), (t1, top_tex + k + 1));
        builder.push((bottom_center, center_tex), (b0, bottom_tex + k), (b1, bottom_tex + k + 1));
    }
    let faces = builder.faces;
    TriangleMesh::new(points, tex_coords, &faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenepick_core::{CullFace, PickRay, SurfaceSide};

    fn outward(mesh: &TriangleMesh) -> bool {
        mesh.faces().iter().all(|f| {
            let [a, b, c] = f.points.map(|i| mesh.points()[i]);
            let n = (b - a).cross(c - a);
            n.length() < 1e-9 || n.dot(a + b + c) > 0.0
        })
    }

    #[test]
    fn test_sphere_with_four_divisions_is_octahedron() {
        let mesh = sphere(100.0, 4).unwrap();
        assert!(outward(&mesh));
        assert_eq!(mesh.num_faces(), 8);
        for p in mesh.points() {
            let l1 = p.x.abs() + p.y.abs() + p.z.abs();
            assert!((l1 - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cylinder_with_four_divisions() {
        let mesh = cylinder(50.0, 200.0, 4).unwrap();
        assert!(outward(&mesh));
        assert_eq!(mesh.num_faces(), 16);
        let ray = PickRay::new(
            DVec3::new(10.0, 20.0, -1000.0),
            DVec3::new(0.0, 0.0, 1000.0),
            0.0,
            100.0,
        );
        let c = mesh.intersect(&ray, CullFace::Back).unwrap();
        assert!((c.point.z + 40.0).abs() < 1e-9);
        assert_eq!(c.side, SurfaceSide::Front);
    }

    #[test]
    fn test_cylinder_caps_face_outwards() {
        let mesh = cylinder(50.0, 200.0, 8).unwrap();
        let down = PickRay::new(
            DVec3::new(5.0, -1000.0, 5.0),
            DVec3::new(0.0, 1000.0, 0.0),
            0.0,
            100.0,
        );
        let c = mesh.intersect(&down, CullFace::Back).unwrap();
        assert!((c.point.y + 100.0).abs() < 1e-9);
        let tex = c.tex_coord.unwrap();
        assert!((tex.x - 0.55).abs() < 1e-9);
        assert!((tex.y - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_fine_sphere_approaches_surface() {
        let mesh = sphere(1.0, 32).unwrap();
        assert!(outward(&mesh));
        let ray = PickRay::new(DVec3::new(0.1, 0.2, -10.0), DVec3::Z, 0.0, 100.0);
        let c = mesh.intersect(&ray, CullFace::Back).unwrap();
        assert!((c.point.length() - 1.0).abs() < 0.01);
    }
}
