// Domain models - Core types and data structures

use std::fmt;

use serde::Serialize;

pub mod time_code;

pub use time_code::{format_time_code, parse_time_code, TimeCode};

/// Span of the window searched for a start keyframe, in seconds
pub const DEFAULT_LOOKBACK_SECONDS: f64 = 60.0;

/// Part of a recording scoped for a keyframe query.
///
/// Renders to the probe's read-interval syntax, where `%` separates the
/// start of the interval from its end and an empty side is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchWindow {
    /// `start%end`
    Bounded { start: f64, end: f64 },
    /// `%end`, from the beginning of the file
    UpTo { end: f64 },
    /// `start%`, until the end of the file
    From { start: f64 },
}

impl SearchWindow {
    /// Bounded window; both bounds are clamped to zero
    pub fn bounded(start: f64, end: f64) -> Self {
        SearchWindow::Bounded {
            start: start.max(0.0),
            end: end.max(0.0),
        }
    }

    /// The `span` seconds preceding `target`, ending at `target`
    pub fn lookback(target: f64, span: f64) -> Self {
        Self::bounded(target - span, target)
    }

    /// Interval string handed to the probe
    pub fn to_interval(&self) -> String {
        match self {
            SearchWindow::Bounded { start, end } => format!("{}%{}", start, end),
            SearchWindow::UpTo { end } => format!("%{}", end),
            SearchWindow::From { start } => format!("{}%", start),
        }
    }
}

impl fmt::Display for SearchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_interval())
    }
}

/// Keyframe timestamps found in a window, ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyframeSet {
    timestamps: Vec<f64>,
}

impl KeyframeSet {
    /// Build a set from probe output; input is expected ascending
    pub fn new(timestamps: Vec<f64>) -> Self {
        debug_assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
        Self { timestamps }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.timestamps
    }

    /// Latest keyframe that does not come after `target`
    pub fn latest_at_or_before(&self, target: f64) -> Option<f64> {
        self.timestamps
            .iter()
            .rev()
            .find(|&&timestamp| timestamp <= target)
            .copied()
    }
}
