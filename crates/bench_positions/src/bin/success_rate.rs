use anyhow::{Context, Result};
use bench_positions::{
    Config, config_base_dir, join_with_positions, read_positions, read_results,
    render::render_outcomes, summarize,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Success rate of a test bench run", long_about = None)]
struct Args {
    /// results.csv written by the test bench
    results: PathBuf,

    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: PathBuf,

    /// Positions CSV the run was evaluated on
    #[arg(short = 'i', long = "positions")]
    positions: Option<PathBuf>,

    /// Render success/failure positions to this PNG
    #[arg(short = 'p', long = "plot")]
    plot: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long = "json")]
    json: bool,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    let args = Args::parse();

    let results = read_results(&args.results)
        .with_context(|| format!("reading {}", args.results.display()))?;
    let summary = summarize(&results);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Success Rate: {}/{} ({:.1}%)",
            summary.successes,
            summary.total,
            summary.success_rate * 100.0
        );
        println!("Total Time: {:.2}s", summary.total_inference_time);
        println!(
            "Average inference time: {:.2}s",
            summary.average_inference_time
        );
    }

    if let Some(plot) = args.plot {
        let config = Config::load_or_default(&args.config)?;
        let (cup, block) = config.object_sizes(config_base_dir(&args.config))?;
        let positions_path = args.positions.unwrap_or(config.generation.output.clone());
        let positions = read_positions(&positions_path)
            .with_context(|| format!("reading {}", positions_path.display()))?;

        let outcomes = join_with_positions(&results, &positions);
        render_outcomes(&config, &outcomes, cup, block)
            .save(&plot)
            .with_context(|| format!("writing {}", plot.display()))?;
        info!("Plot saved to: {}", plot.display());
    }

    Ok(())
}
