//! Tessera - CPU Path Tracing
//!
//! A Monte Carlo path tracer for scenes built from spheres. The image is
//! cut into tiles which a fixed pool of worker threads claims from a
//! shared atomic counter, each worker driving its own PCG sampler.

mod camera;
mod error;
mod hittable;
mod integrator;
mod material;
mod renderer;
mod sampler;
mod scene;
mod scheduler;
mod sphere;
mod tile;

pub use camera::{Camera, CameraSettings};
pub use error::{RenderError, RenderResult, SceneError};
pub use hittable::{HitRecord, Hittable};
pub use integrator::{ray_color, shade_normal, sky_gradient, trace_path, Integrator, T_EPSILON};
pub use material::{Color, Material, ScatterResult};
pub use renderer::{
    color_to_rgb, linear_to_gamma, render, render_pixel, Framebuffer, RenderConfig, Rgb,
};
pub use sampler::{gen_f32, Pcg32};
pub use scene::Scene;
pub use scheduler::{ThreadCount, TileRegion, TileScheduler, MAX_THREADS};
pub use sphere::Sphere;
pub use tile::{generate_tiles, Tile, DEFAULT_TILE_SIZE};

/// Re-export Vec3 and common math types from tessera_math
pub use tessera_math::{Interval, Ray, Vec3};
