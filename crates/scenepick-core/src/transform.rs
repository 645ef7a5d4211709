//! Node transforms.
//!
//! A node's placement in its parent is described by separate components that
//! are composed around a pivot point, the centre of the node's local bounds:
//!
//! `T(translation + pivot) * R(axis, angle) * S(scale) * T(-pivot) * extra[0] * extra[1] ...`

use glam::{DAffine3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Determinants smaller than this are treated as singular.
const SINGULAR_DETERMINANT: f64 = 1e-300;

/// A node transformation represented as separate components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTransform {
    /// Translation component.
    pub translation: DVec3,
    /// Rotation axis. Need not be unit length.
    pub rotation_axis: DVec3,
    /// Rotation angle around `rotation_axis`, in degrees.
    pub rotation_angle: f64,
    /// Scale component.
    pub scale: DVec3,
    /// Additional transforms applied before the component transform.
    pub extra: Vec<DAffine3>,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation_axis: DVec3::Z,
            rotation_angle: 0.0,
            scale: DVec3::ONE,
            extra: Vec::new(),
        }
    }
}

impl NodeTransform {
    /// Creates a new identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Creates a transform from a translation.
    #[must_use]
    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Creates a transform that applies an arbitrary affine map.
    #[must_use]
    pub fn from_affine(affine: DAffine3) -> Self {
        Self {
            extra: vec![affine],
            ..Default::default()
        }
    }

    /// Sets the translation.
    #[must_use]
    pub fn with_translation(mut self, translation: DVec3) -> Self {
        self.translation = translation;
        self
    }

    /// Sets the rotation axis and angle in degrees.
    #[must_use]
    pub fn with_rotation(mut self, axis: DVec3, degrees: f64) -> Self {
        self.rotation_axis = axis;
        self.rotation_angle = degrees;
        self
    }

    /// Sets the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// Appends an extra transform.
    #[must_use]
    pub fn with_extra(mut self, affine: DAffine3) -> Self {
        self.extra.push(affine);
        self
    }

    /// Returns the rotation as a quaternion. A zero axis yields no rotation.
    #[must_use]
    pub fn rotation(&self) -> DQuat {
        match self.rotation_axis.try_normalize() {
            Some(axis) if self.rotation_angle != 0.0 => {
                DQuat::from_axis_angle(axis, self.rotation_angle.to_radians())
            }
            _ => DQuat::IDENTITY,
        }
    }

    /// Composes the local-to-parent transform around `pivot`.
    #[must_use]
    pub fn local_to_parent(&self, pivot: DVec3) -> DAffine3 {
        let component = DAffine3::from_translation(self.translation + pivot)
            * DAffine3::from_quat(self.rotation())
            * DAffine3::from_scale(self.scale)
            * DAffine3::from_translation(-pivot);
        self.extra.iter().fold(component, |acc, m| acc * *m)
    }

    /// Composes the local-to-parent transform with the pivot at the origin.
    #[must_use]
    pub fn to_affine(&self) -> DAffine3 {
        self.local_to_parent(DVec3::ZERO)
    }

    /// Returns true if the pivot affects the composed transform.
    #[must_use]
    pub fn uses_pivot(&self) -> bool {
        self.rotation() != DQuat::IDENTITY || self.scale != DVec3::ONE
    }

    /// Returns true if the transform does not change coordinates.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.translation == DVec3::ZERO
            && (self.rotation_angle == 0.0 || self.rotation_axis == DVec3::ZERO)
            && self.scale == DVec3::ONE
            && self.extra.iter().all(|m| *m == DAffine3::IDENTITY)
    }
}

/// Inverts `affine`, or returns `None` if it is singular or not finite.
#[must_use]
pub fn try_inverse(affine: &DAffine3) -> Option<DAffine3> {
    let det = affine.matrix3.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
        return None;
    }
    let inverse = affine.inverse();
    inverse.is_finite().then_some(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn test_identity() {
        let t = NodeTransform::identity();
        assert!(t.is_identity());
        assert_eq!(t.to_affine(), DAffine3::IDENTITY);
    }

    #[test]
    fn test_rotation_about_pivot() {
        // 100x100 rectangle rotated around its centre.
        let t = NodeTransform::identity().with_rotation(DVec3::Y, 45.0);
        let m = t.local_to_parent(DVec3::new(50.0, 50.0, 0.0));
        let p = m.transform_point3(DVec3::new(21.715_728_752_538_1, 50.0, 0.0));
        assert!((p.x - 30.0).abs() < 1e-6);
        assert!((p.z - 20.0).abs() < 1e-6);
        // The pivot itself does not move.
        assert!(approx(
            m.transform_point3(DVec3::new(50.0, 50.0, 0.0)),
            DVec3::new(50.0, 50.0, 0.0)
        ));
    }

    #[test]
    fn test_rotation_is_right_handed() {
        let t = NodeTransform::identity().with_rotation(DVec3::X, 90.0);
        let p = t.to_affine().transform_point3(DVec3::new(0.0, -100.0, 0.0));
        assert!(approx(p, DVec3::new(0.0, 0.0, -100.0)));
    }

    #[test]
    fn test_extra_applied_first() {
        let t = NodeTransform::from_translation(DVec3::new(10.0, 0.0, 0.0))
            .with_extra(DAffine3::from_scale(DVec3::splat(2.0)));
        let p = t.to_affine().transform_point3(DVec3::ONE);
        assert!(approx(p, DVec3::new(12.0, 2.0, 2.0)));
    }

    #[test]
    fn test_try_inverse() {
        let m = NodeTransform::identity()
            .with_scale(DVec3::new(2.0, 4.0, 0.5))
            .with_translation(DVec3::new(1.0, 2.0, 3.0))
            .to_affine();
        let inv = try_inverse(&m).unwrap();
        assert!(approx(inv.transform_point3(m.transform_point3(DVec3::ONE)), DVec3::ONE));

        let flat = NodeTransform::identity().with_scale(DVec3::new(1.0, 0.0, 1.0));
        assert!(try_inverse(&flat.to_affine()).is_none());
    }

    #[test]
    fn test_zero_axis_means_no_rotation() {
        let t = NodeTransform::identity().with_rotation(DVec3::ZERO, 30.0);
        assert_eq!(t.rotation(), DQuat::IDENTITY);
    }
}
