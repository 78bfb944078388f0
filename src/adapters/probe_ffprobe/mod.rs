//! FFprobe adapter for keyframe probing
//!
//! Keyframes are read from packet flags rather than decoded frames, so a
//! query only demuxes the requested interval. The interval is passed to
//! `-read_intervals` verbatim.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::adapters::process_std::{describe_status, output_tail};
use crate::domain::model::SearchWindow;
use crate::error::{KeyTrimError, KeyTrimResult};
use crate::ports::{KeyframeProbePort, ProcessRunner};

#[derive(Deserialize)]
struct FfprobePackets {
    #[serde(default)]
    packets: Vec<PacketEntry>,
}

#[derive(Deserialize)]
struct PacketEntry {
    pts_time: Option<String>,
    flags: Option<String>,
}

/// FFprobe-based keyframe probe
pub struct FfprobeAdapter {
    ffprobe: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe: impl Into<PathBuf>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
            runner,
        }
    }

    /// Argument list for a keyframe query over `window`
    pub fn probe_args(path: &Path, window: &SearchWindow) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-read_intervals",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        args.push(window.to_interval().into());
        args.extend(
            ["-show_entries", "packet=pts_time,flags", "-of", "json"]
                .iter()
                .map(OsString::from),
        );
        args.push(path.as_os_str().to_os_string());
        args
    }
}

/// Keyframe timestamps from ffprobe's JSON packet listing, ascending
pub fn parse_keyframe_packets(json: &str) -> Result<Vec<f64>, String> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let listing: FfprobePackets =
        serde_json::from_str(json).map_err(|e| format!("unparsable ffprobe output: {}", e))?;

    let mut timestamps = Vec::new();
    for packet in listing.packets {
        let is_key = packet
            .flags
            .as_deref()
            .map_or(false, |flags| flags.contains('K'));
        if !is_key {
            continue;
        }
        // "N/A" shows up for packets without a presentation timestamp
        let Some(pts) = packet.pts_time.as_deref().and_then(|t| t.parse::<f64>().ok()) else {
            continue;
        };
        if pts.is_finite() {
            timestamps.push(pts);
        }
    }

    timestamps.sort_by(f64::total_cmp);
    timestamps.dedup();
    Ok(timestamps)
}

impl KeyframeProbePort for FfprobeAdapter {
    fn keyframe_timestamps(&self, path: &Path, window: &SearchWindow) -> KeyTrimResult<Vec<f64>> {
        let failure = |message: String| KeyTrimError::ProbeFailure {
            path: path.to_path_buf(),
            window: window.to_interval(),
            message,
        };

        let args = Self::probe_args(path, window);
        debug!(probe = %self.ffprobe.display(), ?args, "probing keyframes");

        let output = self
            .runner
            .run(&self.ffprobe, &args)
            .map_err(|e| failure(format!("could not launch {}: {}", self.ffprobe.display(), e)))?;

        if !output.success() {
            return Err(failure(format!(
                "{}: {}",
                describe_status(output.status_code),
                output_tail(&output.stderr, 5)
            )));
        }

        parse_keyframe_packets(&output.stdout).map_err(failure)
    }
}
