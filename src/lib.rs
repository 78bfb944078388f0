//! keytrim library
//!
//! Lossless trimming of recorded videos. Requested start times are snapped
//! back to the nearest preceding keyframe, found with ffprobe, and the range
//! is extracted with an ffmpeg stream copy.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod planner;
pub mod ports;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use app::{AppContainer, TrimInteractor};
pub use config::TrimConfig;
pub use domain::model::{KeyframeSet, SearchWindow, TimeCode};
pub use engine::{BatchReport, TrimExecutor};
pub use error::{KeyTrimError, KeyTrimResult};
pub use planner::{BatchTrimPlanner, PlanSequence, TrimPlan};
