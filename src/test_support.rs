//! Fake ports shared by unit tests

use std::collections::HashSet;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::model::SearchWindow;
use crate::error::{KeyTrimError, KeyTrimResult};
use crate::ports::{KeyframeProbePort, ProcessOutput, ProcessRunner, StreamCopyArgs, TranscodePort};

/// Process runner that replays canned output and records every call
pub struct ScriptedRunner {
    outputs: Mutex<Vec<io::Result<ProcessOutput>>>,
    pub calls: Mutex<Vec<(PathBuf, Vec<OsString>)>>,
}

impl ScriptedRunner {
    /// Outputs are handed out in order, one per call
    pub fn new(outputs: Vec<io::Result<ProcessOutput>>) -> Self {
        let mut outputs = outputs;
        outputs.reverse();
        Self {
            outputs: Mutex::new(outputs),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(stdout: &str) -> Self {
        Self::new(vec![Ok(ProcessOutput {
            status_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })])
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));
        self.outputs
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(io::Error::new(io::ErrorKind::Other, "no scripted output")))
    }
}

/// Keyframe probe answering every query with the same timestamps
pub struct FakeProbe {
    keyframes: Vec<f64>,
    fail: bool,
    pub queries: Mutex<Vec<(PathBuf, String)>>,
}

impl FakeProbe {
    pub fn with_keyframes(keyframes: Vec<f64>) -> Self {
        Self {
            keyframes,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            keyframes: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl KeyframeProbePort for FakeProbe {
    fn keyframe_timestamps(&self, path: &Path, window: &SearchWindow) -> KeyTrimResult<Vec<f64>> {
        self.queries
            .lock()
            .unwrap()
            .push((path.to_path_buf(), window.to_interval()));
        if self.fail {
            return Err(KeyTrimError::ProbeFailure {
                path: path.to_path_buf(),
                window: window.to_interval(),
                message: "unreadable".to_string(),
            });
        }
        Ok(self.keyframes.clone())
    }
}

/// Transcoder that records requests and fails for chosen inputs
#[derive(Default)]
pub struct FakeTranscoder {
    failing_inputs: HashSet<PathBuf>,
    pub requests: Mutex<Vec<StreamCopyArgs>>,
}

impl FakeTranscoder {
    pub fn failing_for(inputs: &[&str]) -> Self {
        Self {
            failing_inputs: inputs.iter().map(PathBuf::from).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl TranscodePort for FakeTranscoder {
    fn stream_copy(&self, args: &StreamCopyArgs) -> KeyTrimResult<()> {
        self.requests.lock().unwrap().push(args.clone());
        if self.failing_inputs.contains(&args.input) {
            return Err(KeyTrimError::TranscodeFailure {
                source_path: args.input.clone(),
                destination: args.output.clone(),
                message: "exit code 1".to_string(),
            });
        }
        Ok(())
    }
}
