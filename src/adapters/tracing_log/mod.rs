// Tracing log adapter - Structured logging using tracing crate

use tracing_subscriber::EnvFilter;

use crate::error::{KeyTrimError, KeyTrimResult};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check that `level` names a tracing level
pub fn validate_log_level(level: &str) -> KeyTrimResult<()> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(KeyTrimError::config(format!(
            "Invalid log level: {}. Valid levels: {}",
            level,
            LOG_LEVELS.join(", ")
        )))
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this again after a
/// subscriber is installed is a no-op.
pub fn init_logging(level: &str, json: bool) -> KeyTrimResult<()> {
    validate_log_level(level)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("debug").is_ok());
        assert!(validate_log_level("WARN").is_ok());
        assert!(validate_log_level("loud").is_err());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        assert!(init_logging("info", false).is_ok());
        assert!(init_logging("info", true).is_ok());
    }
}
