//! Indexed triangle meshes.
//!
//! Faces reference points, texture coordinates and (optionally) normals by
//! index. Indices are validated once at construction, so picking can index
//! without checks.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use scenepick_core::{Aabb, Candidate, CullFace, PickRay, Result, ScenePickError, SurfaceSide};

/// Layout of one face in a flat face array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VertexFormat {
    /// `[p0, t0, p1, t1, p2, t2]`
    #[default]
    PointTexcoord,
    /// `[p0, n0, t0, p1, n1, t1, p2, n2, t2]`
    PointNormalTexcoord,
}

impl VertexFormat {
    /// Number of indices per face.
    pub fn face_stride(self) -> usize {
        match self {
            VertexFormat::PointTexcoord => 6,
            VertexFormat::PointNormalTexcoord => 9,
        }
    }
}

/// Index triple(s) of one triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshFace {
    /// Point indices.
    pub points: [usize; 3],
    /// Texture coordinate indices, if the mesh is textured.
    pub tex_coords: Option<[usize; 3]>,
    /// Normal indices, if the mesh carries normals.
    pub normals: Option<[usize; 3]>,
}

/// Barycentric hit on a single triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Ray parameter.
    pub t: f64,
    /// Weight of the second vertex.
    pub u: f64,
    /// Weight of the third vertex.
    pub v: f64,
    /// Front when the triangle's winding faces the ray.
    pub side: SurfaceSide,
}

/// A triangle mesh.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleMesh {
    points: Vec<DVec3>,
    tex_coords: Vec<DVec2>,
    normals: Vec<DVec3>,
    faces: Vec<MeshFace>,
}

impl TriangleMesh {
    /// Creates an untextured mesh from point index triples.
    pub fn from_triangles(points: Vec<DVec3>, triangles: &[[usize; 3]]) -> Result<Self> {
        let faces = triangles
            .iter()
            .map(|&points| MeshFace {
                points,
                tex_coords: None,
                normals: None,
            })
            .collect();
        Self::from_parts(points, Vec::new(), Vec::new(), faces)
    }

    /// Creates a textured mesh from `[p0, t0, p1, t1, p2, t2]` faces.
    pub fn new(points: Vec<DVec3>, tex_coords: Vec<DVec2>, faces: &[[usize; 6]]) -> Result<Self> {
        let faces = faces
            .iter()
            .map(|f| MeshFace {
                points: [f[0], f[2], f[4]],
                tex_coords: Some([f[1], f[3], f[5]]),
                normals: None,
            })
            .collect();
        Self::from_parts(points, tex_coords, Vec::new(), faces)
    }

    /// Creates a textured mesh with normals from `[p0, n0, t0, ...]` faces.
    pub fn with_normals(
        points: Vec<DVec3>,
        normals: Vec<DVec3>,
        tex_coords: Vec<DVec2>,
        faces: &[[usize; 9]],
    ) -> Result<Self> {
        let faces = faces
            .iter()
            .map(|f| MeshFace {
                points: [f[0], f[3], f[6]],
                normals: Some([f[1], f[4], f[7]]),
                tex_coords: Some([f[2], f[5], f[8]]),
            })
            .collect();
        Self::from_parts(points, tex_coords, normals, faces)
    }

    /// Creates a mesh from flat coordinate and index arrays.
    ///
    /// `points` and `normals` hold xyz triples, `tex_coords` uv pairs, and
    /// `faces` one record of [`VertexFormat::face_stride`] indices per face.
    /// `normals` is ignored for [`VertexFormat::PointTexcoord`].
    pub fn from_flat(
        format: VertexFormat,
        points: &[f32],
        normals: &[f32],
        tex_coords: &[f32],
        faces: &[i32],
    ) -> Result<Self> {
        let points = cast_records::<_, 3>(points)?
            .iter()
            .map(|p| DVec3::new(p[0].into(), p[1].into(), p[2].into()))
            .collect();
        let tex_coords = cast_records::<_, 2>(tex_coords)?
            .iter()
            .map(|t| DVec2::new(t[0].into(), t[1].into()))
            .collect();
        match format {
            VertexFormat::PointTexcoord => {
                let faces = cast_records::<_, 6>(faces)?
                    .iter()
                    .enumerate()
                    .map(|(i, f)| to_indices(i, f))
                    .collect::<Result<Vec<_>>>()?;
                Self::new(points, tex_coords, &faces)
            }
            VertexFormat::PointNormalTexcoord => {
                let normals = cast_records::<_, 3>(normals)?
                    .iter()
                    .map(|n| DVec3::new(n[0].into(), n[1].into(), n[2].into()))
                    .collect();
                let faces = cast_records::<_, 9>(faces)?
                    .iter()
                    .enumerate()
                    .map(|(i, f)| to_indices(i, f))
                    .collect::<Result<Vec<_>>>()?;
                Self::with_normals(points, normals, tex_coords, &faces)
            }
        }
    }

    fn from_parts(
        points: Vec<DVec3>,
        tex_coords: Vec<DVec2>,
        normals: Vec<DVec3>,
        faces: Vec<MeshFace>,
    ) -> Result<Self> {
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(ScenePickError::InvalidGeometry(format!(
                "mesh point {p} is not finite"
            )));
        }
        for (i, face) in faces.iter().enumerate() {
            check_indices(i, &face.points, points.len())?;
            if let Some(t) = &face.tex_coords {
                check_indices(i, t, tex_coords.len())?;
            }
            if let Some(n) = &face.normals {
                check_indices(i, n, normals.len())?;
            }
        }
        log::debug!(
            "built triangle mesh: {} points, {} faces",
            points.len(),
            faces.len()
        );
        Ok(Self {
            points,
            tex_coords,
            normals,
            faces,
        })
    }

    /// Returns the points.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns the texture coordinates.
    pub fn tex_coords(&self) -> &[DVec2] {
        &self.tex_coords
    }

    /// Returns the normals.
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Returns the faces.
    pub fn faces(&self) -> &[MeshFace] {
        &self.faces
    }

    /// Returns the number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Local bounds of all points.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.points.iter().copied())
    }

    /// Intersects a local-space ray with the mesh.
    ///
    /// Reports the nearest face hit within the clips that survives culling.
    /// On equal distances the earlier face wins.
    pub fn intersect(&self, ray: &PickRay, cull: CullFace) -> Option<Candidate> {
        let mut best: Option<(usize, TriangleHit)> = None;
        for (i, face) in self.faces.iter().enumerate() {
            let [a, b, c] = face.points.map(|p| self.points[p]);
            let Some(hit) = ray_intersect_triangle(ray, a, b, c) else {
                continue;
            };
            if !cull.accepts(hit.side) || !ray.contains_t(hit.t) {
                continue;
            }
            if best.map_or(true, |(_, held)| hit.t < held.t) {
                best = Some((i, hit));
            }
        }
        let (index, hit) = best?;
        Some(self.candidate(index, &hit, ray))
    }

    fn candidate(&self, index: usize, hit: &TriangleHit, ray: &PickRay) -> Candidate {
        let face = &self.faces[index];
        let w = 1.0 - hit.u - hit.v;
        let mut candidate = Candidate::new(hit.t, ray.at(hit.t), hit.side).with_face(index);

        if let Some([t0, t1, t2]) = face.tex_coords {
            let tex = self.tex_coords[t0] * w
                + self.tex_coords[t1] * hit.u
                + self.tex_coords[t2] * hit.v;
            candidate = candidate.with_tex_coord(tex);
        }

        let normal = match face.normals {
            Some([n0, n1, n2]) => {
                self.normals[n0] * w + self.normals[n1] * hit.u + self.normals[n2] * hit.v
            }
            None => {
                let [a, b, c] = face.points.map(|p| self.points[p]);
                (b - a).cross(c - a)
            }
        };
        candidate.with_normal(normal)
    }
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Edges and vertices count as inside. Returns `None` for rays parallel to
/// the triangle's plane and for degenerate triangles; clips are not checked.
pub fn ray_intersect_triangle(
    ray: &PickRay,
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let det = edge1.dot(h);

    let scale = edge1.length() * edge2.length() * ray.direction.length();
    if det.abs() <= f64::EPSILON * scale || !det.is_finite() {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    let side = if det > 0.0 {
        SurfaceSide::Front
    } else {
        SurfaceSide::Back
    };
    Some(TriangleHit { t, u, v, side })
}

fn check_indices(face: usize, indices: &[usize; 3], len: usize) -> Result<()> {
    match indices.iter().find(|&&i| i >= len) {
        Some(&index) => Err(ScenePickError::IndexOutOfRange {
            face,
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len,
        }),
        None => Ok(()),
    }
}

fn cast_records<T, const N: usize>(flat: &[T]) -> Result<&[[T; N]]>
where
    T: bytemuck::Pod,
    [T; N]: bytemuck::Pod,
{
    bytemuck::try_cast_slice(flat).map_err(|_| ScenePickError::SizeMismatch {
        expected: N,
        actual: flat.len(),
    })
}

fn to_indices<const N: usize>(face: usize, record: &[i32; N]) -> Result<[usize; N]> {
    let mut out = [0usize; N];
    for (slot, &index) in out.iter_mut().zip(record) {
        *slot = usize::try_from(index).map_err(|_| {
            ScenePickError::InvalidGeometry(format!("face {face} has negative index {index}"))
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn mesh_xy() -> TriangleMesh {
        TriangleMesh::from_flat(
            VertexFormat::PointTexcoord,
            &[0.0, 0.0, 0.0, 100.0, 0.0, 0.0, 100.0, 100.0, 0.0],
            &[],
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            &[0, 0, 2, 2, 1, 1],
        )
        .unwrap()
    }

    fn meshes_xy(faces: &[i32]) -> TriangleMesh {
        TriangleMesh::from_flat(
            VertexFormat::PointTexcoord,
            &[
                0.0, 0.0, 0.0, 100.0, 0.0, 0.0, 100.0, 100.0, 0.0, //
                0.0, 0.0, -7.0, 100.0, 0.0, -7.0, 100.0, 100.0, -7.0,
            ],
            &[],
            &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            faces,
        )
        .unwrap()
    }

    fn ray_at(x: f64, y: f64) -> PickRay {
        PickRay::new(DVec3::new(x, y, -1000.0), DVec3::new(0.0, 0.0, 1000.0), 0.0, 100.0)
    }

    #[test]
    fn test_pick_textured_face() {
        let c = mesh_xy().intersect(&ray_at(60.0, 20.0), CullFace::Back).unwrap();
        assert_eq!(c.face, Some(0));
        assert!((c.point - DVec3::new(60.0, 20.0, 0.0)).length() < EPS);
        assert!((c.t - 1.0).abs() < EPS);
        assert!((c.tex_coord.unwrap() - DVec2::new(0.6, 0.2)).length() < EPS);
        assert_eq!(c.side, SurfaceSide::Front);
        assert_eq!(c.normal, Some(DVec3::NEG_Z));
    }

    #[test]
    fn test_outside_and_culled() {
        let m = mesh_xy();
        assert!(m.intersect(&ray_at(60.0, 70.0), CullFace::Back).is_none());
        assert!(m.intersect(&ray_at(60.0, 20.0), CullFace::Front).is_none());
        assert!(m.intersect(&ray_at(60.0, 20.0), CullFace::None).is_some());
    }

    #[test]
    fn test_nearest_face() {
        let m = meshes_xy(&[0, 0, 2, 2, 1, 1, 3, 0, 5, 2, 4, 1]);
        let c = m.intersect(&ray_at(60.0, 20.0), CullFace::Back).unwrap();
        assert_eq!(c.face, Some(1));
        assert!((c.point.z + 7.0).abs() < EPS);

        let m = meshes_xy(&[3, 0, 5, 2, 4, 1, 0, 0, 2, 2, 1, 1]);
        let c = m.intersect(&ray_at(60.0, 20.0), CullFace::Back).unwrap();
        assert_eq!(c.face, Some(0));
        assert!((c.point.z + 7.0).abs() < EPS);
    }

    #[test]
    fn test_nearest_through_back_face() {
        let m = meshes_xy(&[0, 0, 2, 2, 1, 1, 3, 0, 4, 1, 5, 2]);
        let c = m.intersect(&ray_at(60.0, 20.0), CullFace::Back).unwrap();
        assert_eq!(c.face, Some(0));
        let c = m.intersect(&ray_at(60.0, 20.0), CullFace::None).unwrap();
        assert_eq!(c.face, Some(1));
        assert_eq!(c.side, SurfaceSide::Back);
    }

    #[test]
    fn test_vertex_hit_is_inside() {
        let c = mesh_xy().intersect(&ray_at(0.0, 0.0), CullFace::Back).unwrap();
        assert!((c.tex_coord.unwrap()).length() < EPS);
    }

    #[test]
    fn test_clips() {
        let m = meshes_xy(&[0, 0, 2, 2, 1, 1, 3, 0, 5, 2, 4, 1]);
        let mut ray = ray_at(60.0, 20.0);
        ray.near_t = 0.995;
        let c = m.intersect(&ray, CullFace::Back).unwrap();
        assert_eq!(c.face, Some(0));
        ray.far_t = 0.999;
        assert!(m.intersect(&ray, CullFace::Back).is_none());
    }

    #[test]
    fn test_interpolated_normals() {
        let m = TriangleMesh::with_normals(
            vec![DVec3::ZERO, DVec3::new(100.0, 100.0, 0.0), DVec3::new(100.0, 0.0, 0.0)],
            vec![DVec3::new(0.0, 0.0, -1.0), DVec3::new(1.0, 0.0, -1.0)],
            vec![DVec2::ZERO],
            &[[0, 0, 0, 1, 1, 0, 2, 1, 0]],
        )
        .unwrap();
        let c = m.intersect(&ray_at(60.0, 20.0), CullFace::Back).unwrap();
        let n = c.normal.unwrap();
        assert!((n.length() - 1.0).abs() < EPS);
        assert!(n.x > 0.0 && n.z < 0.0);
    }

    #[test]
    fn test_validation() {
        let err = TriangleMesh::new(vec![DVec3::ZERO], vec![DVec2::ZERO], &[[0, 0, 1, 0, 0, 0]])
            .unwrap_err();
        assert!(matches!(
            err,
            ScenePickError::IndexOutOfRange { face: 0, index: 1, len: 1 }
        ));

        let err = TriangleMesh::from_flat(VertexFormat::PointTexcoord, &[0.0, 1.0], &[], &[], &[])
            .unwrap_err();
        assert!(matches!(err, ScenePickError::SizeMismatch { expected: 3, actual: 2 }));

        let err = TriangleMesh::from_flat(
            VertexFormat::PointTexcoord,
            &[0.0, 0.0, 0.0],
            &[],
            &[0.0, 0.0],
            &[0, 0, -1, 0, 0, 0],
        )
        .unwrap_err();
        assert!(matches!(err, ScenePickError::InvalidGeometry(_)));
    }

    #[test]
    fn test_untextured_mesh() {
        let m = TriangleMesh::from_triangles(
            vec![DVec3::ZERO, DVec3::new(100.0, 100.0, 0.0), DVec3::new(100.0, 0.0, 0.0)],
            &[[0, 1, 2]],
        )
        .unwrap();
        let c = m.intersect(&ray_at(60.0, 20.0), CullFace::Back).unwrap();
        assert_eq!(c.tex_coord, None);
        assert_eq!(c.face, Some(0));
    }
}
