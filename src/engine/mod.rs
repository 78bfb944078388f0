//! Trim execution engine

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

pub mod executor;

pub use executor::TrimExecutor;

/// Result of a completed trim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimOutcome {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub start_seconds: Option<f64>,
    pub duration_seconds: Option<f64>,
    /// Wall time spent in the transcoder
    pub elapsed: Duration,
}

/// Item of a batch that did not produce an output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimFailure {
    pub source_path: PathBuf,
    pub error: String,
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<TrimOutcome>,
    pub failed: Vec<TrimFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when every item produced an output
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
