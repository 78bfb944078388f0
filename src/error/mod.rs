//! Error handling module for keytrim

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for keytrim operations
#[derive(Error, Debug)]
pub enum KeyTrimError {
    /// Text that matches none of the time code grammars
    #[error("Malformed time code: {input:?}. Expected H:MM:SS.mmm, MM:SS.mmm, or seconds")]
    MalformedTimeCode { input: String },

    /// Keyframe probe could not run or could not read the source
    #[error("Failed to probe keyframes of {} in window {window}: {message}", path.display())]
    ProbeFailure {
        path: PathBuf,
        window: String,
        message: String,
    },

    /// Transcoder exited non-zero or could not be launched
    #[error(
        "Transcode of {} -> {} failed: {message}",
        source_path.display(),
        destination.display()
    )]
    TranscodeFailure {
        source_path: PathBuf,
        destination: PathBuf,
        message: String,
    },

    /// End bound does not lie after the resolved start
    #[error(
        "Invalid trim range for {}: end {end:.3}s is not after start {start:.3}s",
        source_path.display()
    )]
    InvalidRange {
        source_path: PathBuf,
        start: f64,
        end: f64,
    },

    /// An earlier item of the same batch already writes this destination
    #[error(
        "Destination {} for {} is already used by an earlier item of this batch",
        destination.display(),
        source_path.display()
    )]
    DuplicateDestination {
        source_path: PathBuf,
        destination: PathBuf,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeyTrimError {
    pub(crate) fn malformed(input: &str) -> Self {
        KeyTrimError::MalformedTimeCode {
            input: input.to_string(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        KeyTrimError::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for keytrim operations
pub type KeyTrimResult<T> = std::result::Result<T, KeyTrimError>;
