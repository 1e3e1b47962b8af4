//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative diffuse bounces up to a configurable limit
//! - Per-pixel seeded random streams (reproducible output)
//! - Parallel bucket rendering with progress and cancellation

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use lume_core::Scene;
use lume_math::{Color, Ray, VectorExt};
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::hittable::intersect;
use crate::sampling::{pixel_seed, RandomSource};
use crate::{Camera, FrameBuffer};

/// Offset applied along the normal to bounce ray origins, so a bounce
/// doesn't re-hit the surface it just left.
pub const DEFAULT_RAY_EPSILON: f64 = 1e-4;

/// Errors that can occur when starting or running a render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("image size must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("samples per pixel must be at least 1")]
    NoSamples,

    #[error("bucket size must be at least 1")]
    EmptyBucket,

    #[error("render cancelled")]
    Cancelled,
}

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Independent path samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum surface interactions per path
    pub max_bounces: u32,
    /// Frame seed; same seed, scene and camera give identical output
    pub seed: u64,
    /// Bounce origin offset along the surface normal
    pub ray_epsilon: f64,
    /// Edge length of the square render buckets
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 843,
            samples_per_pixel: 100,
            max_bounces: 8,
            seed: 0,
            ray_epsilon: DEFAULT_RAY_EPSILON,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    /// Check that the configuration describes a renderable frame.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        if self.bucket_size == 0 {
            return Err(RenderError::EmptyBucket);
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Shared progress counter and cancel flag for a running render.
///
/// Safe to poll from another thread while `render_frame_with_control` runs.
#[derive(Debug, Default)]
pub struct RenderControl {
    cancelled: AtomicBool,
    completed: AtomicU64,
    total: AtomicU64,
}

impl RenderControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the render to stop. Checked between pixels.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Pixels finished so far in the current render.
    pub fn completed_pixels(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Fraction of the frame finished, in [0, 1].
    pub fn progress(&self) -> f64 {
        let total = self.total.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.completed_pixels() as f64 / total as f64
    }

    fn begin(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.completed.store(0, Ordering::Relaxed);
    }

    /// Count `pixels` more as done and log every 10% crossed.
    pub(crate) fn record(&self, pixels: u64) {
        let done = self.completed.fetch_add(pixels, Ordering::Relaxed) + pixels;
        let total = self.total.load(Ordering::Relaxed);
        if total == 0 {
            return;
        }
        let before = (done - pixels) * 10 / total;
        let after = done * 10 / total;
        if after > before {
            log::info!("Render {}% complete", after * 10);
        }
    }
}

/// Trace one light path and return the radiance it carries back.
///
/// Emission is added first, weighted by the throughput so far, then the
/// throughput is tinted by the surface albedo for the next segment. A path
/// ends on a miss, when the throughput reaches black, or after
/// `max_bounces` surface hits. With `max_bounces == 0` nothing is ever
/// evaluated and the result is black.
pub fn trace(
    ray: Ray,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RandomSource,
) -> Color {
    let mut incoming_light = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = ray;

    for _ in 0..config.max_bounces {
        let rec = match intersect(&ray, scene) {
            Some(rec) => rec,
            None => break,
        };

        incoming_light += rec.sphere.emitted().hadamard(throughput);
        throughput = throughput.hadamard(rec.sphere.albedo);
        if throughput == Color::ZERO {
            break;
        }

        let direction = rng.unit_vector_in_hemisphere(rec.normal);
        ray = Ray::new(rec.point + rec.normal * config.ray_epsilon, direction);
    }

    incoming_light
}

/// Render a single pixel: average of `samples_per_pixel` paths, clamped
/// to [0, 1] per channel.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RandomSource,
) -> Color {
    let ray = camera.get_ray(x, y, config.width, config.height);

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        pixel_color += trace(ray, scene, config, rng);
    }
    let average = pixel_color / config.samples_per_pixel as f64;

    average.clamp(Color::ZERO, Color::ONE)
}

/// Render pixel (x, y) with its own random stream of type `R`.
pub(crate) fn render_seeded_pixel<R: RandomSource>(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> Color {
    let index = y as u64 * config.width as u64 + x as u64;
    let mut rng = R::seeded(pixel_seed(config.seed, index));
    render_pixel(camera, scene, x, y, config, &mut rng)
}

/// Render the entire scene to a frame buffer.
///
/// Buckets are traced in parallel; the frame is assembled only after every
/// bucket has finished. Output depends only on the scene, camera and
/// config (including `seed`), not on thread count.
pub fn render_frame<R: RandomSource>(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> RenderResult<FrameBuffer> {
    render_frame_with_control::<R>(scene, camera, config, &RenderControl::new())
}

/// Like [`render_frame`], reporting progress to and honoring cancellation
/// from `control`.
pub fn render_frame_with_control<R: RandomSource>(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    control: &RenderControl,
) -> RenderResult<FrameBuffer> {
    config.validate()?;

    let start = Instant::now();
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    control.begin(config.pixel_count());

    log::info!(
        "Rendering {}x{} @ {} spp, {} bounces, {} spheres, {} buckets",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_bounces,
        scene.len(),
        buckets.len()
    );
    if scene.is_empty() {
        log::warn!("Scene has no spheres, output will be black");
    }

    let results: Option<Vec<BucketResult>> = buckets
        .par_iter()
        .map(|bucket| render_bucket::<R>(bucket, camera, scene, config, control))
        .collect();
    let results = results.ok_or(RenderError::Cancelled)?;

    let mut frame = FrameBuffer::new(config.width, config.height);
    for result in &results {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            frame.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HashRandom, RowOrder};
    use lume_core::Sphere;
    use lume_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Always bounces straight out along the normal.
    struct AlongNormal;

    impl RandomSource for AlongNormal {
        fn next_f64(&mut self) -> f64 {
            0.5
        }

        fn seeded(_seed: u64) -> Self {
            AlongNormal
        }

        fn unit_vector_in_hemisphere(&mut self, normal: Vec3) -> Vec3 {
            normal
        }
    }

    fn config(width: u32, height: u32, samples: u32, bounces: u32) -> RenderConfig {
        RenderConfig {
            width,
            height,
            samples_per_pixel: samples,
            max_bounces: bounces,
            seed: 1234,
            bucket_size: 4,
            ..Default::default()
        }
    }

    /// Camera at the origin facing a light big enough to fill the view.
    fn wall_of_light(color: Color, strength: f64) -> Scene {
        let light = Sphere::new(Vec3::new(0.0, 0.0, -1000.0), 990.0)
            .with_albedo(Color::splat(0.7))
            .with_emission(color, strength);
        Scene::from_spheres([light]).unwrap()
    }

    #[test]
    fn test_zero_bounces_is_black() {
        let scene = wall_of_light(Color::ONE, 1.0);
        let config = config(8, 8, 4, 0);
        let mut rng = HashRandom::new(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(trace(ray, &scene, &config, &mut rng), Color::ZERO);

        let camera = Camera::for_image(Vec3::ZERO, 8, 8);
        let frame = render_frame::<HashRandom>(&scene, &camera, &config).unwrap();
        assert!(frame.pixels().iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_direct_emission() {
        let scene = wall_of_light(Color::new(0.8, 0.6, 0.4), 1.0);
        let config = config(1, 1, 1, 1);
        let mut rng = HashRandom::new(0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let color = trace(ray, &scene, &config, &mut rng);
        assert!((color - Color::new(0.8, 0.6, 0.4)).length() < 1e-12);
    }

    #[test]
    fn test_emission_then_albedo() {
        // Camera looks at a grey sphere; the bounce straight back along the
        // normal hits a light behind the camera.
        let diffuse = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0)
            .with_albedo(Color::new(0.5, 0.25, 1.0));
        let light = Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0)
            .with_albedo(Color::ZERO)
            .with_emission(Color::new(1.0, 1.0, 0.5), 2.0);
        let scene = Scene::from_spheres([diffuse, light]).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // One surface evaluation: the diffuse sphere emits nothing
        let one = trace(ray, &scene, &config(1, 1, 1, 1), &mut AlongNormal);
        assert_eq!(one, Color::ZERO);

        // Second bounce sees the light, tinted by the first surface
        let two = trace(ray, &scene, &config(1, 1, 1, 2), &mut AlongNormal);
        assert!((two - Color::new(1.0, 0.5, 1.0)).length() < 1e-12);

        // Black albedo on the light ends the path; more bounces change nothing
        let many = trace(ray, &scene, &config(1, 1, 1, 16), &mut AlongNormal);
        assert_eq!(many, two);
    }

    #[test]
    fn test_miss_terminates_path() {
        let scene = Scene::showcase();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 7.0), Vec3::new(0.0, 0.0, 1.0));
        let color = trace(ray, &scene, &config(1, 1, 1, 8), &mut HashRandom::new(3));
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_light_filling_view_converges() {
        let emission = Color::new(0.9, 0.5, 0.1);
        let scene = wall_of_light(emission, 1.0);
        let config = config(16, 9, 32, 8);
        let camera = Camera::for_image(Vec3::ZERO, 16, 9);

        let frame = render_frame::<StdRng>(&scene, &camera, &config).unwrap();
        for color in frame.pixels() {
            assert!((*color - emission).length() < 1e-9, "got {:?}", color);
        }
    }

    #[test]
    fn test_empty_scene_is_black() {
        let scene = Scene::new();
        let config = config(5, 3, 2, 4);
        let camera = Camera::for_image(Vec3::ZERO, 5, 3);

        let frame = render_frame::<HashRandom>(&scene, &camera, &config).unwrap();
        assert_eq!(frame.pixels().len(), 15);
        assert!(frame.to_rgb8(RowOrder::TopDown).iter().all(|b| *b == 0));
    }

    #[test]
    fn test_render_is_reproducible() {
        let scene = Scene::showcase();
        let config = config(24, 14, 4, 4);
        let camera = Camera::for_image(Vec3::new(0.0, 0.0, 7.0), 24, 14);

        let a = render_frame::<HashRandom>(&scene, &camera, &config).unwrap();
        let b = render_frame::<HashRandom>(&scene, &camera, &config).unwrap();
        assert_eq!(a.to_rgb8(RowOrder::TopDown), b.to_rgb8(RowOrder::TopDown));

        let c = render_frame::<StdRng>(&scene, &camera, &config).unwrap();
        let d = render_frame::<StdRng>(&scene, &camera, &config).unwrap();
        assert_eq!(c.to_rgb8(RowOrder::TopDown), d.to_rgb8(RowOrder::TopDown));
    }

    #[test]
    fn test_bucket_size_does_not_change_output() {
        let scene = Scene::showcase();
        let camera = Camera::for_image(Vec3::new(0.0, 0.0, 7.0), 20, 12);
        let small = config(20, 12, 2, 3);
        let large = RenderConfig {
            bucket_size: 64,
            ..small.clone()
        };

        let a = render_frame::<HashRandom>(&scene, &camera, &small).unwrap();
        let b = render_frame::<HashRandom>(&scene, &camera, &large).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_over_bright_light_saturates() {
        let scene = wall_of_light(Color::ONE, 100.0);
        let config = config(6, 4, 2, 4);
        let camera = Camera::for_image(Vec3::ZERO, 6, 4);

        let frame = render_frame::<HashRandom>(&scene, &camera, &config).unwrap();
        let bytes = frame.to_rgb8(RowOrder::TopDown);
        assert_eq!(bytes.len(), 6 * 4 * 3);
        assert!(bytes.iter().all(|b| *b == 255));
        assert!(frame.pixels().iter().all(|c| *c == Color::ONE));
    }

    #[test]
    fn test_indirect_light_reaches_diffuse_surfaces() {
        let scene = Scene::showcase();
        let camera = Camera::for_image(Vec3::new(0.0, 0.0, 7.0), 32, 18);
        let config = config(32, 18, 64, 4);

        // Top of the red sphere faces the light
        let mut rng = StdRng::seed_from_u64(11);
        let target = Vec3::new(1.0, 0.45, -1.0);
        let direction = (target - camera.position).unit();
        let ray = Ray::new(camera.position, direction);
        let mut total = Color::ZERO;
        for _ in 0..256 {
            total += trace(ray, &scene, &config, &mut rng);
        }
        assert!(total.x > 0.0);
        // Pure red albedo: no green or blue survives the first bounce
        assert_eq!(total.y, 0.0);
        assert_eq!(total.z, 0.0);
    }

    #[test]
    fn test_invalid_config() {
        let scene = Scene::showcase();
        let camera = Camera::default();

        let err = render_frame::<HashRandom>(&scene, &camera, &config(0, 10, 1, 1)).unwrap_err();
        assert_eq!(err, RenderError::EmptyImage { width: 0, height: 10 });

        let err = render_frame::<HashRandom>(&scene, &camera, &config(10, 10, 0, 1)).unwrap_err();
        assert_eq!(err, RenderError::NoSamples);

        let bad_bucket = RenderConfig {
            bucket_size: 0,
            ..config(10, 10, 1, 1)
        };
        assert_eq!(bad_bucket.validate(), Err(RenderError::EmptyBucket));
    }

    #[test]
    fn test_cancelled_render() {
        let scene = Scene::showcase();
        let camera = Camera::for_image(Vec3::new(0.0, 0.0, 7.0), 16, 16);
        let control = RenderControl::new();
        control.cancel();

        let result =
            render_frame_with_control::<HashRandom>(&scene, &camera, &config(16, 16, 1, 2), &control);
        assert_eq!(result.unwrap_err(), RenderError::Cancelled);
    }

    #[test]
    fn test_progress_reaches_one() {
        let scene = Scene::showcase();
        let camera = Camera::for_image(Vec3::new(0.0, 0.0, 7.0), 10, 7);
        let control = RenderControl::new();
        assert_eq!(control.progress(), 0.0);

        render_frame_with_control::<HashRandom>(&scene, &camera, &config(10, 7, 1, 2), &control)
            .unwrap();
        assert_eq!(control.completed_pixels(), 70);
        assert_eq!(control.progress(), 1.0);
    }
}
