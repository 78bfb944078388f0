//! Time code parsing and formatting
//!
//! A time code is a number of seconds that is at least one millisecond once
//! rounded. Anything that would denote less ("0", "", "-5", "0.0004") means
//! "no trim" and is represented as `None`, never as an error. Only text that
//! matches no grammar at all is a [`KeyTrimError::MalformedTimeCode`].

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{KeyTrimError, KeyTrimResult};

/// Positive, finite point in a recording, in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeCode {
    seconds: f64,
}

impl TimeCode {
    /// Wrap a seconds value; values that do not round to a whole positive
    /// millisecond, and non-finite values, are "unset"
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        if seconds.is_finite() && (seconds * 1000.0).round() >= 1.0 {
            Some(Self { seconds })
        } else {
            None
        }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse `H:MM:SS[.mmm]`, `MM:SS[.mmm]` or a bare number of seconds.
    ///
    /// Input that parses as a plain number is taken as seconds without any
    /// colon splitting. Otherwise the text must have exactly two or three
    /// colon-separated components; empty components count as zero.
    pub fn parse(text: &str) -> KeyTrimResult<Option<Self>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(KeyTrimError::malformed(text));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [minutes, seconds] => (
                0.0,
                parse_component(minutes, text)?,
                parse_component(seconds, text)?,
            ),
            [hours, minutes, seconds] => (
                parse_component(hours, text)?,
                parse_component(minutes, text)?,
                parse_component(seconds, text)?,
            ),
            _ => return Err(KeyTrimError::malformed(text)),
        };

        Ok(Self::from_seconds(hours * 3600.0 + minutes * 60.0 + seconds))
    }

    /// Same as [`TimeCode::parse`], with absent input meaning "no trim"
    pub fn parse_opt(text: Option<&str>) -> KeyTrimResult<Option<Self>> {
        match text {
            Some(text) => Self::parse(text),
            None => Ok(None),
        }
    }

    /// Shortest of `S.mmm`, `M:SS.mmm` and `H:MM:SS.mmm` that fits the value
    pub fn format_hms(&self) -> String {
        // Rounding happens on the millisecond remainder only; a remainder
        // that rounds up to a full second carries into the whole units.
        let total_millis = (self.seconds * 1000.0).round() as u64;
        let millis = total_millis % 1000;
        let total_secs = total_millis / 1000;
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let secs = total_secs % 60;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
        } else if minutes > 0 {
            format!("{}:{:02}.{:03}", minutes, secs, millis)
        } else {
            format!("{}.{:03}", secs, millis)
        }
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

impl Serialize for TimeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format_hms())
    }
}

fn parse_component(component: &str, original: &str) -> KeyTrimResult<f64> {
    let component = component.trim();
    if component.is_empty() {
        return Ok(0.0);
    }

    match component.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(KeyTrimError::malformed(original)),
    }
}

/// Parse optional time code text straight to seconds
pub fn parse_time_code(text: Option<&str>) -> KeyTrimResult<Option<f64>> {
    Ok(TimeCode::parse_opt(text)?.map(|tc| tc.as_seconds()))
}

/// Format optional seconds; unset values and values under half a millisecond
/// have no time code
pub fn format_time_code(seconds: Option<f64>) -> Option<String> {
    seconds
        .and_then(TimeCode::from_seconds)
        .map(|tc| tc.format_hms())
}
