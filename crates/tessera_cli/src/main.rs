use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::mem::size_of;
use tessera_math::Ray;
use tessera_renderer::{
    render, Camera, CameraSettings, HitRecord, Material, Pcg32, RenderConfig, Scene, Sphere,
};

mod cli;
mod logger;
mod output;
mod scene_file;

use cli::Args;
use logger::init_logger;
use output::{output_format, save_image};
use scene_file::SceneFile;

/// Log the in-memory size of the types the inner loop touches.
fn log_type_sizes() {
    debug!("size_of Ray: {} bytes", size_of::<Ray>());
    debug!("size_of Sphere: {} bytes", size_of::<Sphere>());
    debug!("size_of Material: {} bytes", size_of::<Material>());
    debug!("size_of HitRecord: {} bytes", size_of::<HitRecord>());
    debug!("size_of Camera: {} bytes", size_of::<Camera>());
    debug!("size_of Pcg32: {} bytes", size_of::<Pcg32>());
}

/// Build the render configuration from command line arguments.
fn render_config(args: &Args) -> RenderConfig {
    RenderConfig {
        width: args.width,
        height: args.height,
        samples_per_pixel: args.samples,
        max_bounces: args.max_bounces,
        tile_width: args.tile_size,
        tile_height: args.tile_size,
        threads: args.thread_count(),
        seed: args.seed,
        integrator: args.integrator.into(),
    }
}

/// Load the scene file if one was given, otherwise the showcase scene.
fn load_scene(args: &Args) -> Result<(Scene, CameraSettings)> {
    match &args.scene {
        Some(path) => {
            let parts = SceneFile::load(path)?.into_parts();
            info!("Loaded {} sphere(s) from {}", parts.0.len(), path.display());
            Ok(parts)
        }
        None => Ok((Scene::showcase(), CameraSettings::default())),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.log_level.into());

    info!("Tessera {}", env!("CARGO_PKG_VERSION"));
    log_type_sizes();

    // Fail on an unsupported extension before rendering
    output_format(&args.output)?;

    let config = render_config(&args);
    let (scene, camera) = load_scene(&args)?;

    let framebuffer = render(&scene, &camera, &config).context("Render failed")?;

    save_image(&framebuffer, &args.output)?;

    Ok(())
}
