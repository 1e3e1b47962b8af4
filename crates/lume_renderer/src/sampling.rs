//! Random sources for hemisphere sampling.
//!
//! The tracer only needs uniform numbers and directions around a normal.
//! Keeping that behind `RandomSource` lets tests swap in a deterministic
//! generator, and lets every pixel own an independently seeded stream so a
//! render is reproducible no matter how rayon schedules the work.

use lume_math::{Vec3, VectorExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for path sampling.
pub trait RandomSource {
    /// Uniform value in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Create a source from a 64-bit seed.
    fn seeded(seed: u64) -> Self
    where
        Self: Sized;

    /// Uniformly distributed unit vector on the sphere.
    fn unit_vector(&mut self) -> Vec3 {
        // Rejection sampling for uniform distribution on sphere
        loop {
            let v = Vec3::new(
                self.next_f64() * 2.0 - 1.0,
                self.next_f64() * 2.0 - 1.0,
                self.next_f64() * 2.0 - 1.0,
            );
            let len_sq = v.length_squared();
            if len_sq > 1e-12 && len_sq <= 1.0 {
                return v / len_sq.sqrt();
            }
        }
    }

    /// Cosine-weighted unit direction in the hemisphere around `normal`.
    ///
    /// `normal` must be unit length. The result always satisfies
    /// `dot(direction, normal) >= 0`.
    fn unit_vector_in_hemisphere(&mut self, normal: Vec3) -> Vec3 {
        let direction = normal + self.unit_vector();

        // Catch degenerate scatter direction
        if direction.length_squared() < 1e-8 {
            return normal;
        }
        direction.unit()
    }
}

impl RandomSource for StdRng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn seeded(seed: u64) -> Self {
        StdRng::seed_from_u64(seed)
    }
}

/// Small hash-based generator (SplitMix64).
///
/// Cheap and fully deterministic. Good enough for reproducibility tests;
/// prefer `StdRng` for final images.
#[derive(Debug, Clone)]
pub struct HashRandom {
    state: u64,
}

impl HashRandom {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        mix64(self.state)
    }
}

impl RandomSource for HashRandom {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        // Top 53 bits -> [0, 1)
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn seeded(seed: u64) -> Self {
        Self::new(seed)
    }
}

/// SplitMix64 finalizer.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for the random stream of one pixel.
///
/// Depends only on the frame seed and the pixel's row-major index.
pub fn pixel_seed(frame_seed: u64, pixel_index: u64) -> u64 {
    mix64(frame_seed ^ mix64(pixel_index.wrapping_add(0x632B_E59B_D9B4_E019)))
}
