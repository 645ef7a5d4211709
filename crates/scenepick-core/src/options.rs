//! Configuration options for pick scenes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScenePickError};

/// Viewport and depth configuration of a scene or sub-scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// Viewport width in pixels.
    pub width: f64,

    /// Viewport height in pixels.
    pub height: f64,

    /// Whether the scene resolves overlapping nodes by distance.
    ///
    /// Without a depth buffer, the topmost node in paint order wins.
    pub depth_buffer: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            depth_buffer: false,
        }
    }
}

impl SceneOptions {
    /// Creates options for a viewport of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Sets whether the scene has a depth buffer.
    #[must_use]
    pub fn with_depth_buffer(mut self, depth_buffer: bool) -> Self {
        self.depth_buffer = depth_buffer;
        self
    }

    /// Returns true if the viewport has a positive, finite area.
    #[must_use]
    pub fn has_valid_viewport(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Parses options from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validated()
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded scene options from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validated(self) -> Result<Self> {
        if self.has_valid_viewport() {
            Ok(self)
        } else {
            Err(ScenePickError::InvalidGeometry(format!(
                "viewport must be positive, got {}x{}",
                self.width, self.height
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = SceneOptions::default();
        assert!(!o.depth_buffer);
        assert!(o.has_valid_viewport());
    }

    #[test]
    fn test_json_partial() {
        let json = r#"{ "width": 1000, "height": 800, "depth_buffer": true }"#;
        let o = SceneOptions::from_json_str(json).unwrap();
        assert_eq!(o, SceneOptions::new(1000.0, 800.0).with_depth_buffer(true));

        let o = SceneOptions::from_json_str(r#"{ "depth_buffer": true }"#).unwrap();
        assert_eq!(o.width, 800.0);
        assert!(o.depth_buffer);
    }

    #[test]
    fn test_json_roundtrip() {
        let o = SceneOptions::new(320.0, 240.0);
        let back = SceneOptions::from_json_str(&o.to_json_string().unwrap()).unwrap();
        assert_eq!(back, o);
    }

    #[test]
    fn test_json_rejects_bad_viewport() {
        let err = SceneOptions::from_json_str(r#"{ "width": 0 }"#).unwrap_err();
        assert!(matches!(err, ScenePickError::InvalidGeometry(_)));
        let err = SceneOptions::from_json_str("{ width: }").unwrap_err();
        assert!(matches!(err, ScenePickError::JsonError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SceneOptions::from_json_file("/nonexistent/scenepick/options.json").unwrap_err();
        assert!(matches!(err, ScenePickError::IoError(_)));
    }
}
