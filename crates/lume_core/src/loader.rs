//! JSON scene description loading.
//!
//! A scene file lists spheres in scene order and optionally a camera:
//!
//! ```json
//! {
//!   "camera": { "position": [0.0, 0.0, 7.0] },
//!   "spheres": [
//!     { "center": [0.0, 0.0, -1.0], "radius": 0.5, "albedo": [1.0, 0.0, 0.0] },
//!     { "center": [0.0, 3.0, -1.0], "radius": 1.0,
//!       "emission_color": [1.0, 1.0, 1.0], "emission_strength": 1.0 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use lume_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::scene::{Scene, SceneError, Sphere};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Camera settings stored alongside the scene.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CameraSettings {
    pub position: Vec3,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    camera: Option<CameraSettings>,
    spheres: Vec<Sphere>,
}

/// A validated scene plus whatever camera the file asked for.
#[derive(Debug, Clone)]
pub struct SceneDocument {
    pub scene: Scene,
    pub camera: Option<CameraSettings>,
}

/// Load a scene description from a JSON file.
pub fn load_scene(path: impl AsRef<Path>) -> LoadResult<SceneDocument> {
    let path = path.as_ref();
    log::info!("Loading scene from: {:?}", path);
    let text = fs::read_to_string(path)?;
    load_scene_from_str(&text)
}

/// Parse a scene description from a JSON string.
pub fn load_scene_from_str(text: &str) -> LoadResult<SceneDocument> {
    let raw: RawDocument = serde_json::from_str(text)?;
    let scene = Scene::from_spheres(raw.spheres)?;
    log::debug!(
        "Parsed scene: {} spheres, {} lights",
        scene.len(),
        scene.lights().count()
    );
    Ok(SceneDocument {
        scene,
        camera: raw.camera,
    })
}
