//! Light transport: follow a camera ray through the scene.
//!
//! The path integrator is an iterative loop rather than a recursion, so
//! stack usage stays flat however many bounces are allowed.

use crate::{Color, Hittable, RenderConfig};
use rand::RngCore;
use tessera_math::{Interval, Ray};

/// Lower bound on hit distance, suppresses self-intersection ("shadow acne").
pub const T_EPSILON: f32 = 0.001;

/// Which quantity a camera ray evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Monte Carlo path tracing with material scattering.
    #[default]
    Path,
    /// Surface normals mapped to RGB, no scattering. Useful for debugging geometry.
    Normals,
}

/// Compute the color seen by a ray.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    match config.integrator {
        Integrator::Path => trace_path(ray, world, config.max_bounces, rng),
        Integrator::Normals => shade_normal(ray, world),
    }
}

/// Trace a path, multiplying in the attenuation of every bounce.
///
/// A path may scatter up to `max_bounces` times; the last scattered ray
/// is still tested against the scene, so it can escape to the sky.
/// Returns black if the path is absorbed or hits a surface after its
/// final allowed scatter.
pub fn trace_path(
    ray: &Ray,
    world: &dyn Hittable,
    max_bounces: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let ray_t = Interval::new(T_EPSILON, f32::INFINITY);
    let mut attenuation = Color::ONE;
    let mut current = *ray;
    let mut bounces = 0;

    loop {
        let Some(rec) = world.hit(&current, ray_t) else {
            return attenuation * sky_gradient(&current);
        };

        if bounces == max_bounces {
            return Color::ZERO;
        }

        match rec.material.scatter(&current, &rec, rng) {
            Some(result) => {
                attenuation *= result.attenuation;
                current = result.scattered;
                bounces += 1;
            }
            None => return Color::ZERO,
        }
    }
}

/// Map the normal of the nearest hit from [-1, 1] to [0, 1] per channel.
pub fn shade_normal(ray: &Ray, world: &dyn Hittable) -> Color {
    match world.hit(ray, Interval::new(T_EPSILON, f32::INFINITY)) {
        Some(rec) => 0.5 * (rec.normal + Color::ONE),
        None => sky_gradient(ray),
    }
}

/// Background: white straight down blending to pale blue straight up,
/// half way between the two at the horizon.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::Pcg32;
    use crate::{Material, Scene, Sphere};
    use rand::SeedableRng;
    use tessera_math::Vec3;

    fn single_sphere(material: Material, albedo: Color) -> Scene {
        Scene::new(vec![Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            albedo,
            material,
        )])
    }

    #[test]
    fn test_sky_gradient() {
        // Ray pointing up should be more blue (less red than white)
        let up_color = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::Y));
        // Ray pointing down should be white
        let down_color = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::NEG_Y));

        assert!((up_color - Color::new(0.5, 0.7, 1.0)).length() < 1e-6);
        assert!((down_color - Color::ONE).length() < 1e-6);
        assert!(up_color.x < down_color.x);
    }

    #[test]
    fn test_miss_returns_exact_sky() {
        let scene = single_sphere(Material::Diffuse, Color::splat(0.5));
        let mut rng = Pcg32::seed_from_u64(1);

        for dir in [Vec3::Y, Vec3::new(0.3, 0.4, 1.0), Vec3::new(-1.0, -0.2, 0.5)] {
            let ray = Ray::new(Vec3::ZERO, dir);
            assert_eq!(trace_path(&ray, &scene, 32, &mut rng), sky_gradient(&ray));
        }
    }

    #[test]
    fn test_zero_bounces_still_sees_sky() {
        let scene = Scene::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(trace_path(&ray, &scene, 0, &mut rng), sky_gradient(&ray));
    }

    #[test]
    fn test_zero_bounces_hit_is_black() {
        let scene = single_sphere(Material::Diffuse, Color::splat(0.5));
        let mut rng = Pcg32::seed_from_u64(1);
        let ray = Ray::new(Vec3::new(0.0, 2.0, -1.0), Vec3::NEG_Y);
        assert_eq!(trace_path(&ray, &scene, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_last_allowed_bounce_can_escape() {
        // One scatter off the top of the sphere, then straight out to the sky
        let albedo = Color::new(0.2, 0.4, 0.6);
        let scene = single_sphere(Material::Diffuse, albedo);
        let ray = Ray::new(Vec3::new(0.0, 2.0, -1.0), Vec3::NEG_Y);

        for seed in 0..16 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let color = trace_path(&ray, &scene, 1, &mut rng);
            assert!(color.min_element() > 0.0, "seed {}: {}", seed, color);
            assert!(color.cmple(albedo + Color::splat(1e-6)).all());
        }
    }

    #[test]
    fn test_single_diffuse_bounce_is_tinted() {
        // Ray hits the top of a sphere and bounces up into the open sky
        let albedo = Color::new(0.2, 0.4, 0.6);
        let scene = single_sphere(Material::Diffuse, albedo);
        let mut rng = Pcg32::seed_from_u64(5);
        let ray = Ray::new(Vec3::new(0.0, 2.0, -1.0), Vec3::NEG_Y);

        let color = trace_path(&ray, &scene, 32, &mut rng);
        assert!(color.cmple(albedo + Color::splat(1e-6)).all());
        assert!(color.length() > 0.0);
    }

    #[test]
    fn test_exhausted_bounce_limit_is_black() {
        // Two mirrors facing each other trap the path until the bounce limit
        let mirror = Material::Metal { fuzz: 0.0 };
        let scene = Scene::new(vec![
            Sphere::new(Vec3::new(0.0, 1001.0, 0.0), 1000.0, Color::ONE, mirror),
            Sphere::new(Vec3::new(0.0, -1001.0, 0.0), 1000.0, Color::ONE, mirror),
        ]);
        let mut rng = Pcg32::seed_from_u64(9);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        assert_eq!(trace_path(&ray, &scene, 16, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_normal_shading_faces_camera() {
        let scene = single_sphere(Material::Diffuse, Color::splat(0.5));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let color = shade_normal(&ray, &scene);
        assert!((color - Color::new(0.5, 0.5, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_ray_color_dispatches_on_integrator() {
        let scene = single_sphere(Material::Diffuse, Color::splat(0.5));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut rng = Pcg32::seed_from_u64(3);

        let config = RenderConfig {
            integrator: Integrator::Normals,
            ..RenderConfig::default()
        };
        assert_eq!(
            ray_color(&ray, &scene, &config, &mut rng),
            shade_normal(&ray, &scene)
        );
    }
}
