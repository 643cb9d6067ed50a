use anyhow::{Context, Result};
use bench_positions::{
    AutoConfirm, Config, ConfirmationPrompt, PruneOutcome, StdinPrompt, prune_positions,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Remove near-duplicate positions from a positions CSV", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: PathBuf,

    /// Positions CSV (defaults to the configured output)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Per-coordinate tolerance in pixels
    #[arg(short = 't', long = "tolerance")]
    tolerance: Option<i32>,

    /// Delete without asking
    #[arg(short = 'y', long = "yes")]
    yes: bool,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)?;
    let path = args.input.unwrap_or(config.generation.output);
    let tolerance = args.tolerance.unwrap_or(config.prune.tolerance);
    anyhow::ensure!(tolerance >= 0, "tolerance must not be negative");

    let mut prompt: Box<dyn ConfirmationPrompt> = if args.yes {
        Box::new(AutoConfirm::new(true))
    } else {
        Box::new(StdinPrompt)
    };

    let outcome = prune_positions(&path, tolerance, &mut *prompt)
        .with_context(|| format!("pruning {}", path.display()))?;

    match outcome {
        PruneOutcome::NothingToPrune { total } => {
            info!("No near-duplicate rows found among {total} rows.");
        }
        PruneOutcome::Declined { candidates } => {
            info!(
                "No rows deleted ({} candidates). CSV file unchanged.",
                candidates.len()
            );
        }
        PruneOutcome::Pruned { removed, remaining } => {
            info!("Deleted {removed} rows. CSV file updated.");
            info!("Remaining rows: {remaining}");
        }
    }
    Ok(())
}
