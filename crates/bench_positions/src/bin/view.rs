use anyhow::{Context, Result};
use bench_positions::{
    Config, config_base_dir,
    overlay::{Sprites, overlay_pair},
    position_at, read_positions,
    render::base_canvas,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Overlay one saved position on a camera frame", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: PathBuf,

    /// Positions CSV (defaults to the configured output)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// 0-based row in the positions CSV
    #[arg(short = 'n', long = "index")]
    index: usize,

    /// Camera frame to draw on; a blank frame with the bench zones if omitted
    #[arg(short = 'b', long = "background")]
    background: Option<PathBuf>,

    /// Overrides the configured overlay transparency
    #[arg(short = 't', long = "transparency")]
    transparency: Option<f64>,

    /// Output PNG (defaults to figs/position_<index>.png)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)?;
    let transparency = args
        .transparency
        .unwrap_or(config.render.overlay_transparency);
    anyhow::ensure!(
        (0.0..=1.0).contains(&transparency),
        "transparency must be within [0, 1]"
    );

    let sprites = Sprites::load(&config, config_base_dir(&args.config))
        .context("loading sprite images")?;

    let input = args.input.unwrap_or(config.generation.output.clone());
    let pairs = read_positions(&input).with_context(|| format!("reading {}", input.display()))?;
    let pair = position_at(&pairs, args.index)?;
    info!(
        "Position {}/{} - {}: cup ({}, {}), block ({}, {})",
        args.index + 1,
        pairs.len(),
        pair.timestamp,
        pair.cup.x,
        pair.cup.y,
        pair.block.x,
        pair.block.y
    );

    let mut frame = match &args.background {
        Some(path) => image::open(path)
            .with_context(|| format!("reading {}", path.display()))?
            .to_rgb8(),
        None => base_canvas(&config).image,
    };
    overlay_pair(&mut frame, pair, &sprites, transparency);

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("figs/position_{}.png", args.index)));
    if let Some(dir) = output.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    frame
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!("View saved to: {}", output.display());
    Ok(())
}
