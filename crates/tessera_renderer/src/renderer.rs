//! Render entry point, per-pixel sampling and the output framebuffer.
//!
//! Implements:
//! - Multi-sampled, jittered pixels with optional defocus blur
//! - Clamping and gamma-2 correction to 8-bit RGB
//! - Tile-parallel rendering via [`TileScheduler`]

use crate::error::{RenderError, RenderResult};
use crate::integrator::{ray_color, Integrator};
use crate::sampler::gen_f32;
use crate::scheduler::{ThreadCount, TileRegion, TileScheduler};
use crate::tile::DEFAULT_TILE_SIZE;
use crate::{Camera, CameraSettings, Color, Hittable, Scene};
use log::info;
use rand::RngCore;
use std::time::Instant;
use tessera_math::Interval;

/// One 24-bit output pixel: red, green, blue.
pub type Rgb = [u8; 3];

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum number of scatter events per path
    pub max_bounces: u32,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Number of worker threads
    pub threads: ThreadCount,
    /// Fixed sampler seed; `None` seeds each worker from the clock
    pub seed: Option<u64>,
    /// What a camera ray evaluates to
    pub integrator: Integrator,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 512,
            samples_per_pixel: 32,
            max_bounces: 32,
            tile_width: DEFAULT_TILE_SIZE,
            tile_height: DEFAULT_TILE_SIZE,
            threads: ThreadCount::Auto,
            seed: None,
            integrator: Integrator::Path,
        }
    }
}

impl RenderConfig {
    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples per pixel must be at least 1".to_string(),
            ));
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "tile size must be non-zero, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        Ok(())
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Final 8-bit image.
///
/// Pixels are stored row-major and row 0 is the bottom of the image,
/// matching the camera's `t = 0` edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Rgb>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y), with y = 0 the bottom row.
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// All pixels, row-major from the bottom row up.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Flatten into contiguous `r, g, b` bytes, bottom row first.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGB.
///
/// Channels are clamped to [0, 1], gamma corrected, scaled to 255 and
/// truncated.
pub fn color_to_rgb(color: Color) -> Rgb {
    let quantize = |c: f32| (255.0 * linear_to_gamma(Interval::UNIT.clamp(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// Returns the average of `samples_per_pixel` jittered samples.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let width = config.width as f32;
    let height = config.height as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width;
        let t = (y as f32 + gen_f32(rng)) / height;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Render every pixel of a claimed tile into its region.
pub(crate) fn render_tile(
    region: &mut TileRegion<'_>,
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) {
    let tile = region.tile();

    for y in tile.y_start..tile.y_end {
        for x in tile.x_start..tile.x_end {
            let color = render_pixel(camera, world, x, y, config, rng);
            region.set(x, y, color_to_rgb(color));
        }
    }
}

/// Render the scene to a framebuffer using all configured worker threads.
///
/// Blocks until every tile is finished. Fails without producing any
/// image if the configuration, scene or thread pool is unusable.
pub fn render(
    scene: &Scene,
    camera_settings: &CameraSettings,
    config: &RenderConfig,
) -> RenderResult<Framebuffer> {
    config.validate()?;
    scene.validate()?;
    let threads = config.threads.resolve()?;

    let camera = camera_settings.build(config.aspect_ratio());
    let mut framebuffer = Framebuffer::new(config.width, config.height);

    let start = Instant::now();
    {
        let scheduler = TileScheduler::new(&mut framebuffer, scene, &camera, config);
        info!(
            "Rendering {}x{} @ {} spp, {} sphere(s), {} tile(s) on {} thread(s)",
            config.width,
            config.height,
            config.samples_per_pixel,
            scene.len(),
            scheduler.tile_count(),
            threads
        );
        scheduler.run(threads)?;
    }
    info!("Rendered in {:.2?}", start.elapsed());

    Ok(framebuffer)
}
