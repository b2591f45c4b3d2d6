//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Color, Material,
};
use serde::{Deserialize, Serialize};
use tessera_math::{Interval, Ray, Vec3};

/// A sphere primitive.
///
/// A negative radius keeps the same surface but flips the outward normal,
/// which turns the sphere into the inner wall of a hollow shell when it is
/// nested inside a slightly larger glass sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    #[serde(default)]
    pub albedo: Color,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, albedo: Color, material: Material) -> Self {
        Self {
            center,
            radius,
            albedo,
            material,
        }
    }

    /// True when the sphere can be intersected without dividing by zero.
    pub fn is_degenerate(&self) -> bool {
        !self.center.is_finite() || !self.radius.is_finite() || self.radius == 0.0
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let half_b = oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            self.material,
            self.albedo,
        ))
    }
}
