// Ports - Interface definitions (contracts)

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::model::SearchWindow;
use crate::error::KeyTrimResult;

/// Captured result of a finished child process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Port for launching external programs and waiting for them to finish
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`, stdin closed, and collect its output.
    ///
    /// An `Err` means the process could not be launched at all; a process
    /// that ran and failed is an `Ok` with a non-zero status.
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput>;
}

/// Port for keyframe probing
pub trait KeyframeProbePort: Send + Sync {
    /// Keyframe timestamps (seconds, ascending) of the primary video stream
    /// inside `window`. An empty result is not an error.
    fn keyframe_timestamps(&self, path: &Path, window: &SearchWindow) -> KeyTrimResult<Vec<f64>>;
}

/// Stream-copy transcode request with named fields
#[derive(Debug, Clone, PartialEq)]
pub struct StreamCopyArgs {
    /// Seek position; no seek is issued when unset or zero
    pub seek: Option<f64>,
    pub input: PathBuf,
    /// Length to extract; runs to the end of the source when unset
    pub duration: Option<f64>,
    pub output: PathBuf,
    /// Replace an existing output instead of refusing to write it
    pub overwrite: bool,
}

impl StreamCopyArgs {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            seek: None,
            input: input.into(),
            duration: None,
            output: output.into(),
            overwrite: false,
        }
    }

    pub fn with_seek(mut self, seek: Option<f64>) -> Self {
        self.seek = seek;
        self
    }

    pub fn with_duration(mut self, duration: Option<f64>) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Seek position that will actually be passed on, if any
    pub fn effective_seek(&self) -> Option<f64> {
        self.seek.filter(|&seek| seek > 0.0)
    }
}

/// Port for lossless stream-copy extraction
pub trait TranscodePort: Send + Sync {
    /// Write `args.output`; any failure to launch or non-zero exit is an error
    fn stream_copy(&self, args: &StreamCopyArgs) -> KeyTrimResult<()>;
}
