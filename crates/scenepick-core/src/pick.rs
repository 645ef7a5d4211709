//! Pick attributes, intersection candidates and pick results.

use std::fmt;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Handle to a node in a scene graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates an id from a raw arena index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of a surface is excluded from picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CullFace {
    /// Both sides can be picked.
    None,
    /// Front faces (facing the ray origin) are ignored.
    Front,
    /// Back faces are ignored.
    #[default]
    Back,
}

impl CullFace {
    /// Returns true if a hit on `side` survives this culling mode.
    #[must_use]
    pub fn accepts(self, side: SurfaceSide) -> bool {
        match self {
            CullFace::None => true,
            CullFace::Front => side == SurfaceSide::Back,
            CullFace::Back => side == SurfaceSide::Front,
        }
    }
}

/// Per-node depth test mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DepthTest {
    /// Depth testing enabled for this node.
    Enable,
    /// Depth testing disabled for this node.
    Disable,
    /// Use the mode of the nearest ancestor that specifies one.
    #[default]
    Inherit,
}

/// Orientation of the surface a ray hit, relative to the ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceSide {
    /// The ray enters the surface from outside.
    Front,
    /// The ray leaves the surface, or hits a face wound away from it.
    Back,
}

/// A single node's local intersection, before arbitration between nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Parametric position along the ray.
    pub t: f64,
    /// Intersection point in the intersected node's local space.
    pub point: DVec3,
    /// Triangle index for mesh geometry.
    pub face: Option<usize>,
    /// Texture coordinate at the hit, when the geometry defines a mapping.
    pub tex_coord: Option<DVec2>,
    /// Unit surface normal in local space.
    pub normal: Option<DVec3>,
    /// Which side of the surface was hit.
    pub side: SurfaceSide,
}

impl Candidate {
    /// Creates a candidate with no face, texture coordinate or normal.
    #[must_use]
    pub fn new(t: f64, point: DVec3, side: SurfaceSide) -> Self {
        Self {
            t,
            point,
            face: None,
            tex_coord: None,
            normal: None,
            side,
        }
    }

    /// Sets the face index.
    #[must_use]
    pub fn with_face(mut self, face: usize) -> Self {
        self.face = Some(face);
        self
    }

    /// Sets the texture coordinate.
    #[must_use]
    pub fn with_tex_coord(mut self, tex_coord: DVec2) -> Self {
        self.tex_coord = Some(tex_coord);
        self
    }

    /// Sets the surface normal, normalizing it.
    #[must_use]
    pub fn with_normal(mut self, normal: DVec3) -> Self {
        self.normal = normal.try_normalize();
        self
    }

    /// Drops face, texture coordinate and normal, leaving only the position.
    #[must_use]
    pub fn bare(self) -> Self {
        Self::new(self.t, self.point, self.side)
    }
}

/// Result of a pick query.
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult {
    /// The picked node, or `None` when nothing was hit.
    pub node: Option<NodeId>,

    /// Intersection point in the picked node's local space. For a miss, the
    /// point in scene space where the pick ray meets the `z = 0` plane or the
    /// near clip.
    pub point: DVec3,

    /// Distance from the ray origin to `point`, measured in the space the ray
    /// was generated in.
    pub distance: f64,

    /// Triangle index for mesh geometry.
    pub face: Option<usize>,

    /// Texture coordinate at the intersection.
    pub tex_coord: Option<DVec2>,

    /// Unit surface normal in the picked node's local space.
    pub normal: Option<DVec3>,
}

impl PickResult {
    /// Creates a result for a hit on `node`.
    pub fn hit(node: NodeId, candidate: &Candidate, distance: f64) -> Self {
        Self {
            node: Some(node),
            point: candidate.point,
            distance,
            face: candidate.face,
            tex_coord: candidate.tex_coord,
            normal: candidate.normal,
        }
    }

    /// Creates a result for a query that hit nothing.
    pub fn miss(point: DVec3, distance: f64) -> Self {
        Self {
            node: None,
            point,
            distance,
            face: None,
            tex_coord: None,
            normal: None,
        }
    }

    /// Returns true if a node was hit.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.node.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cull_face_accepts() {
        assert!(CullFace::None.accepts(SurfaceSide::Front));
        assert!(CullFace::None.accepts(SurfaceSide::Back));
        assert!(CullFace::Back.accepts(SurfaceSide::Front));
        assert!(!CullFace::Back.accepts(SurfaceSide::Back));
        assert!(!CullFace::Front.accepts(SurfaceSide::Front));
        assert!(CullFace::Front.accepts(SurfaceSide::Back));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CullFace::default(), CullFace::Back);
        assert_eq!(DepthTest::default(), DepthTest::Inherit);
    }

    #[test]
    fn test_candidate_bare_drops_details() {
        let c = Candidate::new(2.0, DVec3::ONE, SurfaceSide::Front)
            .with_face(3)
            .with_tex_coord(DVec2::new(0.5, 0.5))
            .with_normal(DVec3::new(0.0, 0.0, -2.0));
        assert_eq!(c.normal, Some(DVec3::NEG_Z));
        let bare = c.bare();
        assert_eq!(bare.face, None);
        assert_eq!(bare.tex_coord, None);
        assert_eq!(bare.normal, None);
        assert_eq!(bare.point, DVec3::ONE);
    }

    #[test]
    fn test_miss_result() {
        let r = PickResult::miss(DVec3::new(1.0, 2.0, 0.0), 10.0);
        assert!(!r.is_hit());
        assert_eq!(r.face, None);
        assert!(r.tex_coord.is_none());
    }
}
