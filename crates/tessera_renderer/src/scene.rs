//! The immutable list of spheres a render traces against.
//!
//! There is no acceleration structure: every ray is tested against every
//! sphere, which is fine for the handful of primitives these scenes use.

use crate::error::SceneError;
use crate::hittable::{HitRecord, Hittable};
use crate::{Color, Material, Sphere};
use tessera_math::{Interval, Ray, Vec3};

/// A flat, read-only collection of spheres.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create a scene from an ordered list of spheres.
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// The built-in demo scene.
    ///
    /// A large ground sphere, three colored diffuse balls, a slightly fuzzy
    /// mirror ball and three hollow glass shells. Each shell is a glass
    /// sphere paired with a negative-radius sphere at the same center.
    pub fn showcase() -> Self {
        let glass = Material::Glass {
            refractive_index: 1.5,
        };

        Self::new(vec![
            Sphere::new(
                Vec3::new(0.0, -500.5, -1.0),
                500.0,
                Color::splat(0.675),
                Material::Diffuse,
            ),
            Sphere::new(
                Vec3::new(0.0, 0.0, -1.0),
                0.5,
                Color::new(0.3, 0.7, 0.3),
                Material::Diffuse,
            ),
            Sphere::new(
                Vec3::new(0.0, 0.0, 0.35),
                0.5,
                Color::new(0.3, 0.3, 0.7),
                Material::Diffuse,
            ),
            Sphere::new(
                Vec3::new(0.0, 0.0, -2.0),
                0.5,
                Color::new(0.7, 0.3, 0.3),
                Material::Diffuse,
            ),
            Sphere::new(
                Vec3::new(1.15, 0.0, -0.85),
                0.5,
                Color::splat(0.8),
                Material::Metal { fuzz: 0.025 },
            ),
            Sphere::new(Vec3::new(1.0, 0.0, 0.25), 0.5, Color::ZERO, glass),
            Sphere::new(Vec3::new(1.0, 0.0, 0.25), -0.475, Color::ZERO, glass),
            Sphere::new(Vec3::new(-1.0, 0.0, -0.35), 0.5, Color::ZERO, glass),
            Sphere::new(Vec3::new(-1.0, 0.0, -0.35), -0.4, Color::ZERO, glass),
            Sphere::new(Vec3::new(-1.25, 0.0, -1.75), 0.5, Color::ZERO, glass),
            Sphere::new(Vec3::new(-1.25, 0.0, -1.75), -0.4, Color::ZERO, glass),
        ])
    }

    /// Check every sphere for geometry or material parameters that would
    /// break the intersection or scatter math.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            if sphere.is_degenerate() {
                return Err(SceneError::DegenerateSphere { index });
            }
            sphere
                .material
                .validate()
                .map_err(|reason| SceneError::InvalidMaterial { index, reason })?;
        }
        Ok(())
    }

    /// The spheres in this scene, in authoring order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Get the number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut nearest = None;
        let mut closest_so_far = ray_t.max;

        for sphere in &self.spheres {
            if let Some(rec) = sphere.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                nearest = Some(rec);
            }
        }

        nearest
    }
}
