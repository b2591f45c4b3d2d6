//! JSON scene descriptions.
//!
//! A scene file holds an optional camera and an optional sphere list:
//!
//! ```json
//! {
//!   "camera": { "look_from": [0, 1, 2], "look_at": [0, 0, -1], "vfov": 60 },
//!   "spheres": [
//!     { "center": [0, -100.5, -1], "radius": 100, "albedo": [0.8, 0.8, 0.0],
//!       "material": { "type": "diffuse" } },
//!     { "center": [1, 0, -1], "radius": 0.5, "albedo": [0.8, 0.6, 0.2],
//!       "material": { "type": "metal", "fuzz": 0.1 } }
//!   ]
//! }
//! ```
//!
//! Missing keys fall back to the showcase camera and scene.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tessera_renderer::{CameraSettings, Scene, Sphere};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    pub camera: Option<CameraSettings>,
    pub spheres: Option<Vec<Sphere>>,
}

impl SceneFile {
    /// Parse a scene description from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid scene description")
    }

    /// Read and parse a scene file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Split into scene and camera, filling gaps with the showcase defaults.
    pub fn into_parts(self) -> (Scene, CameraSettings) {
        let scene = match self.spheres {
            Some(spheres) => Scene::new(spheres),
            None => Scene::showcase(),
        };
        (scene, self.camera.unwrap_or_default())
    }
}
