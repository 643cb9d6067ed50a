use anyhow::{Context, Result};
use bench_positions::{
    Config, PlacementPair, PositionsWriter, SetBuilder, config_base_dir, make_rng,
};
use chrono::Local;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Sample one cup/block placement", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: PathBuf,

    /// RNG seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Append the placement to the positions CSV
    #[arg(long = "save")]
    save: bool,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)?;
    let (cup, block) = config.object_sizes(config_base_dir(&args.config))?;
    let builder = SetBuilder::from_config(&config, cup, block);
    let mut rng = make_rng(args.seed.or(config.generation.seed));

    let (cup_pos, block_pos, fallbacks) = builder.sample_pair(&mut rng);
    if fallbacks > 0 {
        warn!(
            "Could not find valid position after {} attempts, using fallback",
            config.placement.max_attempts
        );
    }
    println!("Cup position: ({}, {})", cup_pos.x, cup_pos.y);
    println!("Block position: ({}, {})", block_pos.x, block_pos.y);

    if args.save {
        let path = &config.generation.output;
        let pair = PlacementPair::new(Local::now().naive_local(), cup_pos, block_pos);
        PositionsWriter::append(path)
            .and_then(|mut w| w.write_pair(&pair))
            .with_context(|| format!("appending to {}", path.display()))?;
        info!("Saved positions to {}", path.display());
    }
    Ok(())
}
