use anyhow::{Context, Result};
use bench_positions::{Config, config_base_dir, read_positions, render::render_positions};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Render saved cup/block positions", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: PathBuf,

    /// Positions CSV (defaults to the configured output)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Output PNG
    #[arg(short = 'o', long = "output", default_value = "figs/positions.png")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)?;
    let (cup, block) = config.object_sizes(config_base_dir(&args.config))?;
    let input = args.input.unwrap_or(config.generation.output.clone());

    let pairs = read_positions(&input).with_context(|| format!("reading {}", input.display()))?;
    info!("Loaded {} position sets", pairs.len());

    render_positions(&config, &pairs, cup, block)
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("Plot saved to: {}", args.output.display());
    Ok(())
}
