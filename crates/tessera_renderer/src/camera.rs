//! Camera for ray generation.

use crate::sampler::gen_f32;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tessera_math::{Ray, Vec3};

/// Camera placement and lens, as authored in a scene description.
///
/// Turned into a [`Camera`] once the image aspect ratio is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    // Camera positioning
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,

    // Lens settings
    pub vfov: f32,     // Vertical field of view in degrees
    pub aperture: f32, // Lens diameter, 0 disables defocus blur
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(-0.5, 0.75, -0.25),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aperture: 0.1,
        }
    }
}

impl CameraSettings {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Set the lens aperture.
    pub fn with_aperture(mut self, aperture: f32) -> Self {
        self.aperture = aperture;
        self
    }

    /// Build the camera for an image with the given width / height ratio.
    pub fn build(&self, aspect_ratio: f32) -> Camera {
        Camera::new(self, aspect_ratio)
    }
}

/// Camera for generating rays into the scene.
///
/// Focus is fixed on the look-at point: the viewport is placed at the
/// distance between `look_from` and `look_at`.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    u: Vec3,
    v: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    lower_left_corner: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Derive the viewport from camera settings.
    pub fn new(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        let theta = settings.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = aspect_ratio * half_height;

        // Calculate camera basis vectors
        let w = (settings.look_from - settings.look_at).normalize();
        let u = settings.vup.cross(w).normalize();
        let v = w.cross(u);

        let focus_dist = (settings.look_from - settings.look_at).length();
        let origin = settings.look_from;
        let horizontal = 2.0 * half_width * focus_dist * u;
        let vertical = 2.0 * half_height * focus_dist * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        Self {
            origin,
            u,
            v,
            horizontal,
            vertical,
            lower_left_corner,
            lens_radius: settings.aperture / 2.0,
        }
    }

    /// Generate a ray through normalized viewport coordinates.
    ///
    /// `(0, 0)` is the lower-left corner of the viewport and `(1, 1)` the
    /// upper-right. The origin is jittered across the lens for defocus blur.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let lens_offset = if self.lens_radius <= 0.0 {
            Vec3::ZERO
        } else {
            let p = self.lens_radius * random_in_unit_disk(rng);
            self.u * p.x + self.v * p.y
        };

        let ray_origin = self.origin + lens_offset;
        let ray_direction =
            self.lower_left_corner + s * self.horizontal + t * self.vertical - ray_origin;

        Ray::new(ray_origin, ray_direction)
    }
}

/// Sample a random point in the unit disk.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
