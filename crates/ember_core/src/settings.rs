//! Render and camera configuration.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes:
//!
//! ```json
//! { "samples_per_pixel": 200, "camera": { "vfov": 40.0 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Camera placement and lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: [f32; 3],
    pub look_at: [f32; 3],
    pub vup: [f32; 3],
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: [0.0, 0.0, 0.0],
            look_at: [0.0, 0.0, -1.0],
            vup: [0.0, 1.0, 0.0],
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

/// Everything the renderer needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Radiance returned by rays that escape the scene
    pub background: [f32; 3],
    /// Base seed; each bucket derives its own stream from it
    pub seed: u64,
    /// Bucket edge length in pixels for parallel rendering
    pub bucket_size: u32,
    pub camera: CameraSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            background: [0.0, 0.0, 0.0],
            seed: 0,
            bucket_size: 64,
            camera: CameraSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&text)?;
        log::debug!("Loaded render settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Layer a partial JSON document on top of these settings.
    ///
    /// Keys missing from `json` keep their current values.
    pub fn merged_with_json(&self, json: &str) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        let overlay: serde_json::Value = serde_json::from_str(json)?;
        merge_json(&mut base, overlay);
        Ok(serde_json::from_value(base)?)
    }
}

fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_json(base.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            RenderSettings::from_json_str(r#"{ "samples_per_pixel": 7, "camera": { "vfov": 40.0 } }"#)
                .unwrap();

        assert_eq!(settings.samples_per_pixel, 7);
        assert_eq!(settings.camera.vfov, 40.0);
        assert_eq!(settings.max_depth, 50);
        assert_eq!(settings.camera.vup, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_merge_keeps_unmentioned_fields() {
        let mut base = RenderSettings::default();
        base.max_depth = 8;
        base.camera.look_from = [1.0, 2.0, 3.0];

        let merged = base
            .merged_with_json(r#"{ "image_width": 64, "camera": { "vfov": 20.0 } }"#)
            .unwrap();

        assert_eq!(merged.image_width, 64);
        assert_eq!(merged.max_depth, 8);
        assert_eq!(merged.camera.vfov, 20.0);
        assert_eq!(merged.camera.look_from, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(RenderSettings::from_json_str("{ not json").is_err());
        assert!(RenderSettings::from_json_str(r#"{ "max_depth": "deep" }"#).is_err());
    }
}
