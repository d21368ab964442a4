use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use lux_core::SceneKind;
use lux_renderer::{render_parallel, RenderConfig};

mod cli;
mod logger;
mod scenes;

use cli::Args;
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_scenes {
        for kind in SceneKind::ALL {
            println!("{kind}");
        }
        return Ok(());
    }

    init_logger(args.log_level.into());

    let settings = args.settings().context("failed to load settings")?;
    settings.validate()?;

    info!("Building scene '{}'", settings.scene);
    let (scene, camera) = scenes::build(&settings)
        .with_context(|| format!("failed to build scene '{}'", settings.scene))?;

    let config = RenderConfig {
        samples_per_pixel: settings.samples_per_pixel,
        max_depth: settings.max_depth,
        seed: settings.seed,
        bucket_size: settings.bucket_size,
    };
    let image = render_parallel(&camera, &scene, &config);

    image
        .to_rgba_image()
        .save(&settings.output)
        .with_context(|| format!("failed to write {}", settings.output.display()))?;
    info!("Wrote {}", settings.output.display());

    Ok(())
}
