//! Trim point resolution and batch planning

use std::path::PathBuf;

use serde::Serialize;

pub mod batch;
pub mod keyframe_locator;
pub mod resolver;

pub use batch::{BatchTrimPlanner, PlanSequence, TrimRequest};
pub use keyframe_locator::KeyframeLocator;
pub use resolver::TrimPointResolver;

use crate::domain::model::format_time_code;
use crate::error::{KeyTrimError, KeyTrimResult};

/// Concrete, keyframe-aligned trim of one source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimPlan {
    /// Source recording, never modified
    pub source_path: PathBuf,
    /// Resolved keyframe start; `None` copies from the beginning
    pub start_seconds: Option<f64>,
    /// Length to extract measured from `start_seconds`; `None` runs to the end
    pub duration_seconds: Option<f64>,
    /// Absolute end as requested
    pub requested_end: Option<f64>,
    pub destination_path: PathBuf,
}

impl TrimPlan {
    /// Reject plans whose end does not lie after the resolved start
    pub fn validate(&self) -> KeyTrimResult<()> {
        let start = self.start_seconds.unwrap_or(0.0);
        match self.duration_seconds {
            Some(duration) if duration.is_nan() || duration <= 0.0 => {
                Err(KeyTrimError::InvalidRange {
                    source_path: self.source_path.clone(),
                    start,
                    end: start + duration,
                })
            }
            _ => Ok(()),
        }
    }

    /// One-line description for logs and reports
    pub fn describe(&self) -> String {
        format!(
            "{} [{} -> {}] -> {}",
            self.source_path.display(),
            format_time_code(self.start_seconds).unwrap_or_else(|| "start".to_string()),
            format_time_code(self.requested_end).unwrap_or_else(|| "end".to_string()),
            self.destination_path.display()
        )
    }
}
