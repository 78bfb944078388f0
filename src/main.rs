//! keytrim
//!
//! Command-line front end for keyframe-aligned lossless video trimming.
//!
//! # Usage
//!
//! ```bash
//! keytrim trim talk.mp4 demo.mkv --start 1:02:03.5 --start 45 --end 1:10:00
//! keytrim plan talk.mp4 --start 90 --json
//! keytrim keyframes talk.mp4 --before 90
//! keytrim timecode 3723.5
//! ```

use std::process::ExitCode;

use clap::Parser;

use keytrim::cli::{commands, Cli};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    commands::run(cli)
}
