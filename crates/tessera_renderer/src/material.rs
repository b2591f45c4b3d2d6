//! Surface materials and the scatter step of the path integrator.

use crate::hittable::HitRecord;
use crate::sampler::gen_f32;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use tessera_math::{Ray, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// How light interacts with a surface.
///
/// Each variant carries only the parameter that applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    /// Lambertian (matte) reflection.
    Diffuse,
    /// Specular reflection, perturbed by `fuzz` (0.0 = perfect mirror).
    Metal { fuzz: f32 },
    /// Refractive dielectric such as glass (1.5) or water (1.33).
    Glass { refractive_index: f32 },
}

/// Outcome of a successful scatter: the next ray and how it tints light.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

impl Material {
    /// Scatter an incoming ray at a hit point.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match *self {
            Material::Diffuse => {
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if scatter_direction.length_squared() < 1e-8 {
                    scatter_direction = rec.normal;
                }

                Some(ScatterResult {
                    attenuation: rec.albedo,
                    scattered: Ray::new(rec.p, scatter_direction),
                })
            }
            Material::Metal { fuzz } => {
                let reflected = reflect(ray_in.direction().normalize(), rec.normal);
                let direction = reflected + fuzz * random_in_unit_sphere(rng);

                // Reflections that end up below the surface are absorbed
                if direction.dot(rec.normal) <= 0.0 {
                    return None;
                }

                Some(ScatterResult {
                    attenuation: rec.albedo,
                    scattered: Ray::new(rec.p, direction),
                })
            }
            Material::Glass { refractive_index } => {
                let refraction_ratio = if rec.front_face {
                    1.0 / refractive_index
                } else {
                    refractive_index
                };

                let unit_direction = ray_in.direction().normalize();
                let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Check for total internal reflection
                let cannot_refract = refraction_ratio * sin_theta > 1.0;

                let direction = if cannot_refract
                    || gen_f32(rng) < reflectance(cos_theta, refraction_ratio)
                {
                    reflect(unit_direction, rec.normal)
                } else {
                    refract(unit_direction, rec.normal, refraction_ratio)
                };

                Some(ScatterResult {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
        }
    }

    /// Check that the material parameter is physically meaningful.
    pub(crate) fn validate(&self) -> Result<(), String> {
        match *self {
            Material::Diffuse => Ok(()),
            Material::Metal { fuzz } if !(fuzz >= 0.0 && fuzz.is_finite()) => {
                Err(format!("metal fuzz must be a finite value >= 0, got {}", fuzz))
            }
            Material::Glass { refractive_index }
                if !(refractive_index > 0.0 && refractive_index.is_finite()) =>
            {
                Err(format!(
                    "glass refractive index must be a finite value > 0, got {}",
                    refractive_index
                ))
            }
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Schlick's approximation for reflectance
#[inline]
fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let perp_len_sq = r_out_perp.length_squared();
    let r_out_parallel = if perp_len_sq >= 1.0 {
        Vec3::ZERO
    } else {
        -(1.0 - perp_len_sq).sqrt() * n
    };
    r_out_perp + r_out_parallel
}

/// Generate a random unit vector, uniform on the sphere.
///
/// Uniform z and uniform azimuth give a uniform distribution over the
/// sphere's surface (Archimedes' hat-box theorem).
fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let azimuth = gen_f32(rng) * 2.0 * PI;
    let z = gen_f32(rng) * 2.0 - 1.0;
    let r = (1.0 - z * z).sqrt();
    Vec3::new(r * azimuth.cos(), r * azimuth.sin(), z)
}

/// Generate a random point strictly inside the unit sphere.
fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Pcg32;
    use rand::SeedableRng;

    fn hit_facing_up(material: Material, albedo: Color, front_face: bool) -> HitRecord {
        HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::Y,
            t: 1.0,
            front_face,
            material,
            albedo,
        }
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refract_index_one_is_straight() {
        let uv = Vec3::new(0.6, -0.8, 0.0);
        let out = refract(uv, Vec3::Y, 1.0);
        assert!((out - uv).length() < 1e-5);
    }

    #[test]
    fn test_reflectance_at_normal_incidence() {
        // r0 for air -> glass
        let r = reflectance(1.0, 1.0 / 1.5);
        assert!((r - 0.04).abs() < 1e-4);
        // Grazing incidence approaches total reflection
        assert!((reflectance(0.0, 1.0 / 1.5) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_diffuse_scatters_into_hemisphere() {
        let mut rng = Pcg32::seed_from_u64(11);
        let albedo = Color::new(0.3, 0.7, 0.3);
        let rec = hit_facing_up(Material::Diffuse, albedo, true);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);

        for _ in 0..1000 {
            let result = Material::Diffuse
                .scatter(&ray_in, &rec, &mut rng)
                .expect("diffuse always scatters");
            assert_eq!(result.attenuation, albedo);
            assert!(result.scattered.direction().dot(rec.normal) >= -1e-5);
            assert_eq!(result.scattered.origin(), rec.p);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mut rng = Pcg32::seed_from_u64(1);
        let material = Material::Metal { fuzz: 0.0 };
        let rec = hit_facing_up(material, Color::new(0.8, 0.8, 0.8), true);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let result = material.scatter(&ray_in, &rec, &mut rng).expect("mirror reflects");
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_metal_never_brightens() {
        let mut rng = Pcg32::seed_from_u64(21);
        let albedo = Color::new(0.9, 0.5, 0.1);
        let material = Material::Metal { fuzz: 0.3 };
        let rec = hit_facing_up(material, albedo, true);
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let incoming = Color::ONE;

        for _ in 0..500 {
            if let Some(result) = material.scatter(&ray_in, &rec, &mut rng) {
                let outgoing = incoming * result.attenuation;
                assert!(outgoing.cmple(incoming).all());
                assert!(result.scattered.direction().dot(rec.normal) > 0.0);
            }
        }
    }

    #[test]
    fn test_metal_grazing_fuzz_can_absorb() {
        // A grazing ray with heavy fuzz is pushed below the surface some of the time.
        let mut rng = Pcg32::seed_from_u64(8);
        let material = Material::Metal { fuzz: 1.0 };
        let rec = hit_facing_up(material, Color::ONE, true);
        let ray_in = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));

        let absorbed = (0..1000)
            .filter(|_| material.scatter(&ray_in, &rec, &mut rng).is_none())
            .count();
        assert!(absorbed > 0);
    }

    #[test]
    fn test_glass_index_one_passes_straight_through() {
        let mut rng = Pcg32::seed_from_u64(2);
        let material = Material::Glass { refractive_index: 1.0 };
        let rec = hit_facing_up(material, Color::ZERO, true);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -2.0, 0.0));

        for _ in 0..100 {
            let result = material.scatter(&ray_in, &rec, &mut rng).expect("glass never absorbs");
            assert_eq!(result.attenuation, Color::ONE);
            assert!((result.scattered.direction() - Vec3::NEG_Y).length() < 1e-5);
        }
    }

    #[test]
    fn test_glass_total_internal_reflection() {
        let mut rng = Pcg32::seed_from_u64(4);
        let material = Material::Glass { refractive_index: 1.5 };
        // Exiting the glass at a shallow angle: ratio 1.5 * sin(~80deg) > 1
        let rec = hit_facing_up(material, Color::ZERO, false);
        let ray_in = Ray::new(Vec3::ZERO, Vec3::new(1.0, -0.17, 0.0));

        let result = material.scatter(&ray_in, &rec, &mut rng).expect("glass never absorbs");
        assert!(result.scattered.direction().y > 0.0);
    }

    #[test]
    fn test_material_json_tags() {
        let metal: Material = serde_json::from_str(r#"{"type": "metal", "fuzz": 0.25}"#).unwrap();
        assert_eq!(metal, Material::Metal { fuzz: 0.25 });

        let diffuse: Material = serde_json::from_str(r#"{"type": "diffuse"}"#).unwrap();
        assert_eq!(diffuse, Material::Diffuse);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(Material::Metal { fuzz: -0.1 }.validate().is_err());
        assert!(Material::Glass { refractive_index: 0.0 }.validate().is_err());
        assert!(Material::Glass { refractive_index: f32::NAN }.validate().is_err());
        assert!(Material::Glass { refractive_index: 1.5 }.validate().is_ok());
        assert!(Material::Diffuse.validate().is_ok());
    }
}
