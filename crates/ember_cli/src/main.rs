mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ember_renderer::{build_scene, render_parallel, Camera, ImageBuffer, RenderSettings, SCENE_NAMES};
use image::{ImageFormat, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.level_filter())
        .init();

    if args.list_scenes {
        for name in SCENE_NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    let config_json = match &args.config {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
        ),
        None => None,
    };
    let layer = |base: &RenderSettings| {
        args.layer_settings(base, config_json.as_deref())
            .with_context(|| match &args.config {
                Some(path) => format!("Invalid config {}", path.display()),
                None => "Invalid render settings".to_string(),
            })
    };

    // One seed drives both the scene's randomness and the sampling
    let seed = layer(&RenderSettings::default())?.seed;
    let mut scene_rng = StdRng::seed_from_u64(seed);
    let Some(scene) = build_scene(&args.scene, &args.texture_dir, &mut scene_rng) else {
        bail!(
            "unknown scene '{}' (available: {})",
            args.scene,
            SCENE_NAMES.join(", ")
        );
    };

    let mut settings = layer(&scene.settings)?;
    settings.seed = seed;

    log::info!("Rendering scene '{}'", scene.name);
    let camera = Camera::new(&settings);
    let image = render_parallel(&camera, scene.world.as_ref(), settings.bucket_size, settings.seed);

    write_image(&image, &args.output)?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}

/// Encode the render as PNG, or as binary PPM for a `.ppm` path.
fn write_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgb = RgbImage::from_raw(image.width, image.height, image.to_rgb8())
        .context("Image buffer size does not match its dimensions")?;

    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));
    let format = if is_ppm { ImageFormat::Pnm } else { ImageFormat::Png };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    rgb.save_with_format(path, format)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
