// positions CSV
pub const POSITIONS_HEADER: [&str; 5] = ["timestamp", "cup_x", "cup_y", "block_x", "block_y"];
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_POSITIONS_CSV: &str = "object_positions.csv";
pub const ENV_POSITIONS_CSV: &str = "BENCH_POSITIONS_CSV";

// bench results CSV
pub const RESULTS_HEADER: [&str; 6] = [
    "position_num",
    "success",
    "inference_time",
    "comment",
    "yolo_predicted_class",
    "yolo_confidence",
];

// sampling defaults (640x480 front camera frame)
pub const DEFAULT_BOUNDARY: (i32, i32, i32, i32) = (80, 30, 580, 430);
pub const DEFAULT_EXCLUSION: (i32, i32, i32, i32) = (280, 0, 388, 120);
pub const DEFAULT_MIN_OBJECT_SEPARATION: i32 = 110;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;
pub const DEFAULT_MIN_CONFIG_SEPARATION: f64 = 23.5;
pub const DEFAULT_NUM_POSITIONS: usize = 100;
pub const DEFAULT_ATTEMPT_MULTIPLIER: u64 = 10_000;
pub const DEFAULT_PRUNE_TOLERANCE: i32 = 20;

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;
/// Sprite alpha is scaled by `1 - transparency` when overlaid on a frame.
pub const DEFAULT_OVERLAY_TRANSPARENCY: f64 = 0.7;

/// Accepted pairs between two progress log lines.
pub const PROGRESS_EVERY: usize = 10;
