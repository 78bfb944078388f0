//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Sources and their positional start/end markers
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Source video files
    #[arg(required = true)]
    pub videos: Vec<PathBuf>,

    /// Start time for the video at the same position (H:MM:SS.mmm, MM:SS.mmm,
    /// or seconds); "" or 0 means no start trim
    #[arg(short, long = "start", allow_hyphen_values = true)]
    pub starts: Vec<String>,

    /// End time for the video at the same position; "" or 0 means no end trim
    #[arg(short, long = "end", allow_hyphen_values = true)]
    pub ends: Vec<String>,

    /// Directory for trimmed files (default: next to each source)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Seconds searched before each start for a keyframe
    #[arg(long)]
    pub lookback: Option<f64>,
}

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Replace existing output files
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the keyframes command
#[derive(Args, Debug)]
pub struct KeyframesArgs {
    /// Input video file path
    pub input: PathBuf,

    /// Requested start time
    #[arg(short, long, allow_hyphen_values = true)]
    pub before: String,

    /// Seconds searched before the start time
    #[arg(long)]
    pub lookback: Option<f64>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the timecode command
#[derive(Args, Debug)]
pub struct TimecodeArgs {
    /// Time codes or seconds values
    #[arg(required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}
