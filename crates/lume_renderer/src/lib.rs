//! Lume Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over scenes made only of spheres.
//! Every surface is diffuse; emissive spheres are the light sources.
//! Intersection is a linear scan over the scene, so keep scenes small.

mod bucket;
mod camera;
mod frame;
mod hittable;
mod renderer;
mod sampling;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, DEFAULT_CAMERA_POSITION};
pub use frame::{color_to_rgb8, FrameBuffer, RowOrder};
pub use hittable::{intersect, HitRecord, Hittable};
pub use renderer::{
    render_frame, render_frame_with_control, render_pixel, trace, RenderConfig, RenderControl,
    RenderError, RenderResult, DEFAULT_RAY_EPSILON,
};
pub use sampling::{pixel_seed, HashRandom, RandomSource};

/// Re-export the scene and math types the renderer API is expressed in
pub use lume_core::{Scene, Sphere};
pub use lume_math::{Color, Interval, Ray, Vec3, VectorExt};
