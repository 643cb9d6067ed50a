use anyhow::{Context, Result};
use bench_positions::{
    Config, PositionsWriter, SetBuilder, config_base_dir, make_rng, render::render_positions,
};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Generate well-distributed cup/block positions", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: PathBuf,

    /// Number of positions to generate
    #[arg(short = 'n', long = "count")]
    count: Option<usize>,

    /// Output CSV path
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// RNG seed for a reproducible set
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Also render the generated positions to this PNG
    #[arg(short = 'p', long = "plot")]
    plot: Option<PathBuf>,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(count) = args.count {
        config.generation.count = count;
    }
    if let Some(output) = args.output {
        config.generation.output = output;
    }
    if args.seed.is_some() {
        config.generation.seed = args.seed;
    }
    config.validate()?;

    let (cup, block) = config.object_sizes(config_base_dir(&args.config))?;
    info!("Cup size: {}x{}", cup.width, cup.height);
    info!("Block size: {}x{}", block.width, block.height);

    let target = config.generation.count;
    let output = config.generation.output.clone();
    info!("Generating {target} well-distributed positions...");

    let mut writer = PositionsWriter::create(&output)
        .with_context(|| format!("creating {}", output.display()))?;
    let builder = SetBuilder::from_config(&config, cup, block);
    let mut rng = make_rng(config.generation.seed);
    let report = builder.build(&mut rng, target, &mut writer)?;

    info!("Generated {}/{} positions", report.pairs.len(), target);
    info!("Saved to: {}", writer.path().display());
    info!("Total attempts: {}", report.attempts);
    if report.fallbacks > 0 {
        warn!(
            "{} samples used the fallback position; check boundary and exclusion sizes",
            report.fallbacks
        );
    }
    if !report.is_complete() {
        warn!(
            "Attempt budget exhausted: only {} of {} positions generated",
            report.pairs.len(),
            target
        );
    }

    if let Some(plot) = args.plot {
        render_positions(&config, &report.pairs, cup, block)
            .save(&plot)
            .with_context(|| format!("writing {}", plot.display()))?;
        info!("Plot saved to: {}", plot.display());
    }

    Ok(())
}
