//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Color, Material};
use tessera_math::{Interval, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Material of the surface that was hit
    pub material: Material,
    /// Albedo of the surface that was hit
    pub albedo: Color,
}

impl HitRecord {
    /// Build a hit record, orienting the normal against the ray.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        material: Material,
        albedo: Color,
    ) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p: ray.at(t),
            normal,
            t,
            front_face,
            material,
            albedo,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly within the given interval.
    ///
    /// Returns the nearest hit inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_face_keeps_outward_normal() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, Material::Diffuse, Color::ONE);

        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_back_face_flips_normal() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::NEG_Z, Material::Diffuse, Color::ONE);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(ray.direction().dot(rec.normal) <= 0.0);
    }
}
