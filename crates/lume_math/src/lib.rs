//! Lume math - double precision vectors, rays and intervals.
//!
//! Vectors come from glam; this crate pins the precision used across the
//! workspace and adds the few helpers the tracer needs on top of it.

// Re-export glam's double precision vector for convenience
pub use glam::DVec3;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::VectorExt;

/// Point, direction or radiance in 3D.
pub type Vec3 = DVec3;

/// Color type alias (RGB, 0-1 for display, unbounded for radiance)
pub type Color = Vec3;
