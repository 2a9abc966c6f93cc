use std::path::PathBuf;

use clap::Parser;
use ember_core::RenderSettings;
use log::LevelFilter;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "ember")]
#[command(about = "Offline CPU path tracer")]
pub struct Args {
    /// Built-in scene to render
    #[arg(long, default_value = "cornell_box")]
    pub scene: String,

    /// Output image (.png, or .ppm for binary PPM)
    #[arg(short, long, default_value = "output.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(long, short = 's')]
    pub spp: Option<u32>,

    /// Maximum ray bounce depth
    #[arg(long, short = 'd')]
    pub depth: Option<u32>,

    /// Seed for scene generation and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file layered over the scene's own render settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding image textures
    #[arg(long, default_value = "assets")]
    pub texture_dir: PathBuf,

    /// Print the available scenes and exit
    #[arg(long)]
    pub list_scenes: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log level implied by the verbosity flag.
    pub fn level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Layer an optional JSON config and then the explicit flags over `base`.
    pub fn layer_settings(
        &self,
        base: &RenderSettings,
        config_json: Option<&str>,
    ) -> ember_core::Result<RenderSettings> {
        let mut settings = match config_json {
            Some(json) => base.merged_with_json(json)?,
            None => base.clone(),
        };
        self.apply_overrides(&mut settings);
        Ok(settings)
    }

    /// Apply explicit flags on top of `settings`.
    pub fn apply_overrides(&self, settings: &mut RenderSettings) {
        if let Some(width) = self.width {
            settings.image_width = width;
        }
        if let Some(height) = self.height {
            settings.image_height = height;
        }
        if let Some(spp) = self.spp {
            settings.samples_per_pixel = spp;
        }
        if let Some(depth) = self.depth {
            settings.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
    }
}
