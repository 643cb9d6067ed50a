pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod prompt;
pub mod pruner;
pub mod render;
pub mod results;
pub mod sampler;
pub mod store;

pub use builder::{BuildReport, SetBuilder};
pub use config::Config;
pub use error::{PlacementError, Result};
pub use geometry::{ObjectKind, Placement, PlacementPair, Rect, Size};
pub use prompt::{AutoConfirm, ConfirmationPrompt, StdinPrompt};
pub use pruner::{PruneOutcome, find_duplicates, prune_positions};
pub use results::{Summary, join_with_positions, read_results, summarize};
pub use sampler::{Neighbor, Sample, Sampler};
pub use store::{PairSink, PositionsWriter, position_at, read_positions, rewrite_positions};

use rand::{SeedableRng, rngs::StdRng};
use std::path::Path;

/// Seeded when a seed is configured, otherwise from OS entropy
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Directory sprite paths in a config file are relative to
pub fn config_base_dir(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
