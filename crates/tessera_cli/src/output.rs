use anyhow::{bail, Context, Result};
use image::{imageops, ImageFormat, RgbImage};
use log::info;
use std::path::Path;
use tessera_renderer::Framebuffer;

/// Pick the encoder from the file extension. Only BMP and PNG are supported.
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("bmp") => Ok(ImageFormat::Bmp),
        Some("png") => Ok(ImageFormat::Png),
        Some(other) => bail!(
            "Unsupported file extension '{}'. Only .bmp and .png formats are supported.",
            other
        ),
        None => bail!("Output path {} has no file extension", path.display()),
    }
}

/// Convert a bottom-up framebuffer into an upright image.
fn to_image(framebuffer: &Framebuffer) -> Result<RgbImage> {
    let mut image = RgbImage::from_raw(
        framebuffer.width,
        framebuffer.height,
        framebuffer.to_rgb_bytes(),
    )
    .context("Framebuffer size does not match its dimensions")?;
    imageops::flip_vertical_in_place(&mut image);
    Ok(image)
}

/// Save the framebuffer, choosing BMP or PNG from the extension.
pub fn save_image(framebuffer: &Framebuffer, path: &Path) -> Result<()> {
    let format = output_format(path)?;
    let image = to_image(framebuffer)?;

    image
        .save_with_format(path, format)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        "Image saved to {} ({}x{})",
        path.display(),
        framebuffer.width,
        framebuffer.height
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tessera_math::Vec3;
    use tessera_renderer::{render, CameraSettings, Integrator, RenderConfig, Scene, ThreadCount};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tessera-{}-{}", std::process::id(), name))
    }

    /// 4x2 framebuffer with a distinct bottom and top row.
    fn sky_framebuffer() -> Framebuffer {
        let config = RenderConfig {
            width: 4,
            height: 2,
            samples_per_pixel: 1,
            tile_width: 2,
            tile_height: 2,
            threads: ThreadCount::Fixed(1),
            seed: Some(3),
            integrator: Integrator::Normals,
            ..RenderConfig::default()
        };
        let camera = CameraSettings::default()
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_aperture(0.0);
        render(&Scene::default(), &camera, &config).unwrap()
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(output_format(Path::new("a.bmp")).unwrap(), ImageFormat::Bmp);
        assert_eq!(output_format(Path::new("a.PNG")).unwrap(), ImageFormat::Png);
        assert!(output_format(Path::new("a.exr")).is_err());
        assert!(output_format(Path::new("image")).is_err());
    }

    #[test]
    fn test_image_is_flipped_upright() {
        let framebuffer = sky_framebuffer();
        let image = to_image(&framebuffer).unwrap();

        // Image row 0 is the top, which is framebuffer row height - 1
        for x in 0..framebuffer.width {
            assert_eq!(image.get_pixel(x, 0).0, framebuffer.get(x, 1));
            assert_eq!(image.get_pixel(x, 1).0, framebuffer.get(x, 0));
        }
    }

    #[test]
    fn test_save_png_round_trip() {
        let framebuffer = sky_framebuffer();
        let path = temp_path("round-trip.png");

        save_image(&framebuffer, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, to_image(&framebuffer).unwrap());
    }

    #[test]
    fn test_save_bmp() {
        let framebuffer = sky_framebuffer();
        let path = temp_path("sky.bmp");

        save_image(&framebuffer, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(&bytes[..2], b"BM");
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let path = temp_path("sky.tga");
        assert!(save_image(&sky_framebuffer(), &path).is_err());
        assert!(!path.exists());
    }
}
