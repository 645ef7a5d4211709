//! Cameras and the pick ray factory.
//!
//! A camera looks down its local `+z` axis with the viewport's top-left
//! corner at the local origin's `x`/`y`. The projection distance `dist` is
//! chosen so that the field of view spans the viewport:
//! `dist = half_extent / tan(field_of_view / 2)`.

use glam::{DAffine3, DVec3};
use serde::{Deserialize, Serialize};

use scenepick_core::PickRay;

/// Default field of view, in degrees.
pub const DEFAULT_FIELD_OF_VIEW: f64 = 30.0;
/// Default near clip distance.
pub const DEFAULT_NEAR_CLIP: f64 = 0.1;
/// Default far clip distance.
pub const DEFAULT_FAR_CLIP: f64 = 100.0;

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Rays run parallel to the view axis, one per pixel.
    Parallel {
        /// Field of view in degrees, used only to place the eye plane.
        field_of_view: f64,
        /// Whether the field of view spans the viewport height (otherwise the width).
        vertical: bool,
    },
    /// Rays fan out from a single eye point.
    Perspective {
        /// Field of view in degrees.
        field_of_view: f64,
        /// Whether the field of view spans the viewport height (otherwise the width).
        vertical: bool,
        /// Keep the eye at the camera origin instead of centring it on the viewport.
        fixed_eye: bool,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Parallel {
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            vertical: true,
        }
    }
}

impl Projection {
    fn field_of_view(self) -> (f64, bool) {
        match self {
            Projection::Parallel {
                field_of_view,
                vertical,
            }
            | Projection::Perspective {
                field_of_view,
                vertical,
                ..
            } => (field_of_view, vertical),
        }
    }
}

/// A camera node's projection and clip distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub projection: Projection,
    /// Near clip distance.
    pub near_clip: f64,
    /// Far clip distance.
    pub far_clip: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Projection::default(),
            near_clip: DEFAULT_NEAR_CLIP,
            far_clip: DEFAULT_FAR_CLIP,
        }
    }
}

impl Camera {
    /// Creates a parallel camera with default settings.
    #[must_use]
    pub fn parallel() -> Self {
        Self::default()
    }

    /// Creates a perspective camera with default settings.
    #[must_use]
    pub fn perspective(fixed_eye: bool) -> Self {
        Self {
            projection: Projection::Perspective {
                field_of_view: DEFAULT_FIELD_OF_VIEW,
                vertical: true,
                fixed_eye,
            },
            ..Self::default()
        }
    }

    /// Sets the field of view in degrees, keeping the projection mode.
    #[must_use]
    pub fn with_field_of_view(mut self, degrees: f64) -> Self {
        match &mut self.projection {
            Projection::Parallel { field_of_view, .. }
            | Projection::Perspective { field_of_view, .. } => *field_of_view = degrees,
        }
        self
    }

    /// Sets whether the field of view spans the viewport height.
    #[must_use]
    pub fn with_vertical_field_of_view(mut self, is_vertical: bool) -> Self {
        match &mut self.projection {
            Projection::Parallel { vertical, .. } | Projection::Perspective { vertical, .. } => {
                *vertical = is_vertical;
            }
        }
        self
    }

    /// Sets the near and far clip distances.
    #[must_use]
    pub fn with_clips(mut self, near_clip: f64, far_clip: f64) -> Self {
        self.near_clip = near_clip;
        self.far_clip = far_clip;
        self
    }

    /// Distance from the eye plane to the viewport plane for a viewport of
    /// `width` x `height`, or `None` if the camera cannot project into it.
    pub fn projection_distance(&self, width: f64, height: f64) -> Option<f64> {
        let (fov, vertical) = self.projection.field_of_view();
        let valid = width.is_finite()
            && height.is_finite()
            && width > 0.0
            && height > 0.0
            && fov > 0.0
            && fov < 180.0
            && self.near_clip.is_finite()
            && !self.far_clip.is_nan()
            && self.near_clip <= self.far_clip;
        if !valid {
            return None;
        }
        let half = if vertical { height } else { width } / 2.0;
        let dist = half / (fov.to_radians() / 2.0).tan();
        (dist.is_finite() && dist > 0.0).then_some(dist)
    }

    /// Builds the ray through viewport pixel `(x, y)`, mapped into the space
    /// of the camera node's scene by `local_to_scene`.
    ///
    /// Returns `None` for an invalid viewport, field of view or clip range.
    pub fn pick_ray(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        local_to_scene: &DAffine3,
    ) -> Option<PickRay> {
        let Some(dist) = self.projection_distance(width, height) else {
            log::debug!("camera cannot project into a {width}x{height} viewport: {self:?}");
            return None;
        };
        let (near, far) = (self.near_clip, self.far_clip);

        let ray = match self.projection {
            Projection::Parallel { .. } => PickRay::new(
                DVec3::new(x, y, -dist),
                DVec3::Z,
                near * dist,
                far * dist,
            ),
            Projection::Perspective { fixed_eye, .. } => {
                let direction = DVec3::new(x - width / 2.0, y - height / 2.0, dist);
                if fixed_eye {
                    PickRay::new(DVec3::ZERO, direction, near / dist, far / dist)
                } else {
                    PickRay::new(DVec3::new(width / 2.0, height / 2.0, -dist), direction, near, far)
                }
            }
        };

        let ray = ray.transformed(local_to_scene);
        if ray.is_valid() {
            Some(ray)
        } else {
            log::debug!("camera transform produced a degenerate pick ray at ({x}, {y})");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Field of view that puts the eye 1000 units in front of a 1000x800 viewport.
    const FOV_1000: f64 = 43.602_818_97;

    #[test]
    fn test_projection_distance() {
        let cam = Camera::perspective(false).with_field_of_view(FOV_1000);
        assert!((cam.projection_distance(1000.0, 800.0).unwrap() - 1000.0).abs() < 1e-5);
        let cam = cam.with_vertical_field_of_view(false);
        assert!((cam.projection_distance(800.0, 1000.0).unwrap() - 1000.0).abs() < 1e-5);
        let default = Camera::default().projection_distance(1000.0, 800.0).unwrap();
        assert!((default - 1492.820_323).abs() < 1e-5);
    }

    #[test]
    fn test_parallel_ray() {
        let ray = Camera::parallel()
            .pick_ray(10.0, 20.0, 1000.0, 800.0, &DAffine3::IDENTITY)
            .unwrap();
        assert!((ray.origin - DVec3::new(10.0, 20.0, -1492.820_323)).length() < 1e-5);
        assert_eq!(ray.direction, DVec3::Z);
        assert!((ray.near_clip() - 149.282_032).abs() < 1e-5);
    }

    #[test]
    fn test_moving_eye_ray() {
        let cam = Camera::perspective(false)
            .with_field_of_view(FOV_1000)
            .with_clips(0.0, 100.0);
        let ray = cam.pick_ray(10.0, 20.0, 1000.0, 800.0, &DAffine3::IDENTITY).unwrap();
        assert!((ray.origin - DVec3::new(500.0, 400.0, -1000.0)).length() < 1e-5);
        // Through the requested pixel on the z = 0 plane.
        let t = ray.plane_z0_t().unwrap();
        assert!((ray.at(t) - DVec3::new(10.0, 20.0, 0.0)).length() < 1e-6);
        assert!((ray.near_clip()).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_eye_ray() {
        let cam = Camera::perspective(true).with_field_of_view(FOV_1000);
        let ray = cam.pick_ray(500.0, 400.0, 1000.0, 800.0, &DAffine3::IDENTITY).unwrap();
        assert_eq!(ray.origin, DVec3::ZERO);
        assert!((ray.near_clip() - 0.1).abs() < 1e-9);
        assert!((ray.far_clip() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_camera_transform_applies() {
        let cam = Camera::perspective(false).with_field_of_view(FOV_1000);
        let m = DAffine3::from_translation(DVec3::new(-350.0, -240.0, 0.0));
        let ray = cam.pick_ray(500.0, 400.0, 1000.0, 800.0, &m).unwrap();
        assert!((ray.origin - DVec3::new(150.0, 160.0, -1000.0)).length() < 1e-5);
        assert!((ray.distance(1.0) - 1000.0).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_cameras() {
        let id = DAffine3::IDENTITY;
        assert!(Camera::default().pick_ray(0.0, 0.0, 0.0, 800.0, &id).is_none());
        assert!(Camera::default()
            .with_field_of_view(180.0)
            .pick_ray(0.0, 0.0, 10.0, 10.0, &id)
            .is_none());
        assert!(Camera::default()
            .with_clips(10.0, 1.0)
            .pick_ray(0.0, 0.0, 10.0, 10.0, &id)
            .is_none());
        let flat = DAffine3::from_scale(DVec3::ZERO);
        assert!(Camera::default().pick_ray(0.0, 0.0, 10.0, 10.0, &flat).is_none());
    }

    #[test]
    fn test_camera_json() {
        let cam: Camera = serde_json::from_str(
            r#"{"projection":{"Perspective":{"field_of_view":45.0,"vertical":false,"fixed_eye":true}}}"#,
        )
        .unwrap();
        assert_eq!(cam.near_clip, DEFAULT_NEAR_CLIP);
        assert!(matches!(cam.projection, Projection::Perspective { fixed_eye: true, .. }));
    }
}
