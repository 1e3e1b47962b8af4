//! Hittable trait and HitRecord for ray-sphere intersection.

use lume_core::{Scene, Sphere};
use lume_math::{Interval, Ray, Vec3, VectorExt};

/// Record of a ray-sphere intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, pointing away from the sphere center
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f64,
    /// The sphere that was hit
    pub sphere: &'a Sphere,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the nearest intersection with `t` strictly inside `ray_t`.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        // a*t^2 + b*t + c = 0
        let oc = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Only the near root. Rays never start inside a sphere: camera
        // rays start outside and bounce rays are pushed off the surface.
        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        if !ray_t.surrounds(t) {
            return None;
        }

        let point = ray.at(t);
        Some(HitRecord {
            point,
            normal: (point - self.center).unit(),
            t,
            sphere: self,
        })
    }
}

impl Hittable for Scene {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        // Strict upper bound: a later sphere at the same distance never
        // replaces an earlier one.
        for sphere in self.spheres() {
            if let Some(rec) = sphere.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}

/// Nearest hit in front of the ray origin, if any.
#[inline]
pub fn intersect<'a>(ray: &Ray, scene: &'a Scene) -> Option<HitRecord<'a>> {
    scene.hit(ray, Interval::FORWARD)
}
