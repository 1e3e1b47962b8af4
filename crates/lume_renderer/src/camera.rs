//! Pinhole camera for primary ray generation.

use lume_math::{Ray, Vec3, VectorExt};

/// Default camera position, seven units back from the origin.
pub const DEFAULT_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 7.0);

/// Camera looking down -Z with an image plane one unit in front of it.
///
/// Pixel row 0 is the top of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Width over height, applied to the horizontal axis
    pub aspect_ratio: f64,
}

impl Camera {
    /// Create a new camera.
    pub fn new(position: Vec3, aspect_ratio: f64) -> Self {
        Self {
            position,
            aspect_ratio,
        }
    }

    /// Camera whose aspect ratio matches a `width` x `height` image.
    pub fn for_image(position: Vec3, width: u32, height: u32) -> Self {
        Self::new(position, width as f64 / height.max(1) as f64)
    }

    /// Generate the primary ray through the center of pixel (i, j).
    pub fn get_ray(&self, i: u32, j: u32, width: u32, height: u32) -> Ray {
        // Pixel center -> normalized device coordinates in [-1, 1]
        let u = (i as f64 + 0.5) / width as f64;
        let v = (j as f64 + 0.5) / height as f64;
        let ndc_x = (2.0 * u - 1.0) * self.aspect_ratio;
        let ndc_y = 1.0 - 2.0 * v;

        Ray::new(self.position, Vec3::new(ndc_x, ndc_y, -1.0).unit())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_CAMERA_POSITION, 16.0 / 9.0)
    }
}
