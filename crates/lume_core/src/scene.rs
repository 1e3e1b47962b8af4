//! Scene model: an ordered list of spheres.
//!
//! A scene is built once and then only read. The renderer takes `&Scene`, so
//! nothing can change it while a frame is being traced.

use lume_math::{Color, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("sphere {index} has invalid radius {radius} (must be finite and > 0)")]
    InvalidRadius { index: usize, radius: f64 },

    #[error("sphere {index} has invalid emission strength {strength} (must be finite and >= 0)")]
    InvalidEmission { index: usize, strength: f64 },
}

/// Default grey albedo for spheres that don't specify one.
pub const DEFAULT_ALBEDO: Color = Color::new(0.5, 0.5, 0.5);

/// A sphere primitive with a diffuse surface and optional emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,

    /// Per-channel reflectance, expected in [0, 1]
    #[serde(default = "default_albedo")]
    pub albedo: Color,

    #[serde(default)]
    pub emission_color: Color,

    #[serde(default)]
    pub emission_strength: f64,
}

fn default_albedo() -> Color {
    DEFAULT_ALBEDO
}

impl Sphere {
    /// Create a grey, non-emissive sphere.
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            albedo: DEFAULT_ALBEDO,
            emission_color: Color::ZERO,
            emission_strength: 0.0,
        }
    }

    /// Set the surface reflectance.
    pub fn with_albedo(mut self, albedo: Color) -> Self {
        self.albedo = albedo;
        self
    }

    /// Make this sphere a light source.
    pub fn with_emission(mut self, color: Color, strength: f64) -> Self {
        self.emission_color = color;
        self.emission_strength = strength;
        self
    }

    /// Check if this sphere emits light.
    pub fn is_light(&self) -> bool {
        self.emission_strength > 0.0
    }

    /// Radiance leaving the surface on its own.
    #[inline]
    pub fn emitted(&self) -> Color {
        self.emission_color * self.emission_strength
    }

    /// Check the geometric and emission invariants.
    ///
    /// `index` is only used to label the error.
    pub fn validate(&self, index: usize) -> Result<(), SceneError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SceneError::InvalidRadius {
                index,
                radius: self.radius,
            });
        }
        if !(self.emission_strength.is_finite() && self.emission_strength >= 0.0) {
            return Err(SceneError::InvalidEmission {
                index,
                strength: self.emission_strength,
            });
        }
        Ok(())
    }
}

/// An ordered collection of spheres.
///
/// Order matters only as the tie-break when two spheres are hit at exactly
/// the same distance: the earlier one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from spheres, rejecting the first invalid one.
    pub fn from_spheres(spheres: impl IntoIterator<Item = Sphere>) -> Result<Self, SceneError> {
        let mut scene = Self::new();
        for sphere in spheres {
            scene.add(sphere)?;
        }
        Ok(scene)
    }

    /// Append a sphere.
    pub fn add(&mut self, sphere: Sphere) -> Result<&mut Self, SceneError> {
        sphere.validate(self.spheres.len())?;
        self.spheres.push(sphere);
        Ok(self)
    }

    /// All spheres in scene order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Iterate over emissive spheres.
    pub fn lights(&self) -> impl Iterator<Item = &Sphere> {
        self.spheres.iter().filter(|s| s.is_light())
    }

    /// Get the number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Red and green spheres lit by a white spherical light above them.
    pub fn showcase() -> Self {
        let spheres = [
            Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5).with_albedo(Color::new(1.0, 0.0, 0.0)),
            Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.6).with_albedo(Color::new(0.0, 1.0, 0.0)),
            Sphere::new(Vec3::new(0.0, 3.0, -1.0), 1.0)
                .with_albedo(Color::ONE)
                .with_emission(Color::ONE, 1.0),
        ];
        Self { spheres: spheres.to_vec() }
    }
}
