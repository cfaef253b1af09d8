// snowshot - Run the snowfall headless and save a frame
//
// Pipeline:
//   1. Parse switches into a SnowConfig (same names as the wallpaper host)
//   2. Optionally read the tree sprite size from an image file
//   3. Tick the simulation at a fixed frame rate for N seconds
//   4. Rasterize flakes and trees, write PNG
//
// Usage: cargo run --bin snowshot -- [--seconds 12] [--fps 60] [--width 1280]
//        [--height 720] [--seed N] [--tree-sprite tree.png] [--out snow.png]
//        [--max-snowflakes 200] [--wind-chance 20] [--power-save true] ...

mod args;
mod raster;

use std::env;
use std::path::PathBuf;

use log::{error, info};
use thiserror::Error;

use snowfall_engine::{Bounds, ConfigError, Simulation, WindPhase};

use args::Args;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read tree sprite {path}: {source}")]
    Sprite { path: PathBuf, source: image::ImageError },
    #[error("failed to write {path}: {source}")]
    Output { path: PathBuf, source: image::ImageError },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let argv: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&argv) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(argv: &[String]) -> Result<(), SnapshotError> {
    let mut args = Args::parse(argv)?;

    if let Some(path) = &args.tree_sprite {
        let dims = image::image_dimensions(path).map_err(|source| SnapshotError::Sprite {
            path: path.clone(),
            source,
        })?;
        info!("tree sprite {}x{}", dims.0, dims.1);
        args.config.prop_sprite = dims;
    }

    let bounds = Bounds::new(args.width, args.height);
    let dt = 1.0 / args.fps as f32;
    let ticks = (args.seconds.max(0.0) * args.fps as f32).round() as usize;

    let mut sim = Simulation::new(args.config, args.seed);
    let mut gusts = 0usize;
    let mut calm = true;

    for _ in 0..ticks {
        sim.tick(dt, bounds);

        let now_calm = sim.wind().phase() == WindPhase::Calm;
        if calm && !now_calm {
            gusts += 1;
        }
        calm = now_calm;
    }

    info!(
        "{:.1}s simulated: {} flakes, {} trees, {} gusts, wind {:+.1}",
        sim.elapsed(),
        sim.active_count(),
        sim.props().len(),
        gusts,
        sim.wind().force()
    );

    let (w, h) = (args.width.max(1) as u32, args.height.max(1) as u32);
    let img = raster::draw(w, h, sim.props(), sim.flakes());
    img.save(&args.output).map_err(|source| SnapshotError::Output {
        path: args.output.clone(),
        source,
    })?;

    info!("wrote {}", args.output.display());
    Ok(())
}
