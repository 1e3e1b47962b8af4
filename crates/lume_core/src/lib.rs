//! Lume Core - scene model for the path tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Sphere`, `Scene`
//! - **Scene files**: JSON scene description loading
//!
//! # Example
//!
//! ```ignore
//! use lume_core::load_scene;
//!
//! let document = load_scene("scene.json")?;
//! println!("Loaded {} spheres, {} lights",
//!     document.scene.len(),
//!     document.scene.lights().count());
//! ```

pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use loader::{
    load_scene, load_scene_from_str, CameraSettings, LoadError, LoadResult, SceneDocument,
};
pub use scene::{Scene, SceneError, Sphere};
