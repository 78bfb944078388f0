//! CLI module for keytrim
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{BatchArgs, KeyframesArgs, PlanArgs, TimecodeArgs, TrimArgs};

/// keytrim
///
/// Cuts leading footage off recordings without re-encoding. Requested start
/// times are moved back to the nearest preceding keyframe so the stream copy
/// stays decodable.
#[derive(Parser, Debug)]
#[command(name = "keytrim")]
#[command(about = "Keyframe-aligned lossless trimming of recorded videos")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./keytrim.toml when present)
    #[arg(long, global = true, env = "KEYTRIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim videos at keyframe-aligned start points
    Trim(TrimArgs),
    /// Show the trims that would be performed, without running ffmpeg
    Plan(PlanArgs),
    /// List keyframes in the window before a start time
    Keyframes(KeyframesArgs),
    /// Normalize time codes and print their value in seconds
    Timecode(TimecodeArgs),
}
