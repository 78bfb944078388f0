//! Configuration loading and hierarchy management
//!
//! Precedence, lowest first: built-in defaults, TOML file, environment
//! variables, command-line overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapters::tracing_log::validate_log_level;
use crate::domain::model::DEFAULT_LOOKBACK_SECONDS;
use crate::error::{KeyTrimError, KeyTrimResult};

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "keytrim.toml";

/// Environment variable names and the settings they override
pub const ENV_FFMPEG: &str = "KEYTRIM_FFMPEG";
pub const ENV_FFPROBE: &str = "KEYTRIM_FFPROBE";
pub const ENV_LOOKBACK: &str = "KEYTRIM_LOOKBACK";
pub const ENV_OUTPUT_DIR: &str = "KEYTRIM_OUTPUT_DIR";
pub const ENV_OVERWRITE: &str = "KEYTRIM_OVERWRITE";
pub const ENV_LOG_LEVEL: &str = "KEYTRIM_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "KEYTRIM_LOG_JSON";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrimConfig {
    /// Transcoder executable
    pub ffmpeg_path: PathBuf,
    /// Probe executable
    pub ffprobe_path: PathBuf,
    /// Span searched before a requested start for a keyframe
    pub lookback_seconds: f64,
    /// Output directory; unset writes next to each source
    pub output_dir: Option<PathBuf>,
    /// Replace existing outputs
    pub overwrite: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            lookback_seconds: DEFAULT_LOOKBACK_SECONDS,
            output_dir: None,
            overwrite: false,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    keytrim: TrimConfig,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_json: bool,
    pub output_dir: Option<PathBuf>,
    pub overwrite: bool,
    pub lookback_seconds: Option<f64>,
}

impl TrimConfig {
    /// Parse a `[keytrim]` TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> KeyTrimResult<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| KeyTrimError::config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.keytrim)
    }

    pub fn from_file(path: &Path) -> KeyTrimResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KeyTrimError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; otherwise `keytrim.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> KeyTrimResult<Self> {
        let mut config = match path {
            Some(path) => {
                info!(path = %path.display(), "loading configuration");
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                info!(path = DEFAULT_CONFIG_FILE, "loading configuration");
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("no configuration file, using defaults");
                Self::default()
            }
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> KeyTrimResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup(ENV_FFMPEG) {
            self.ffmpeg_path = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup(ENV_FFPROBE) {
            self.ffprobe_path = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup(ENV_LOOKBACK) {
            self.lookback_seconds = value.trim().parse().map_err(|_| {
                KeyTrimError::config(format!("{} is not a number: {}", ENV_LOOKBACK, value))
            })?;
            applied += 1;
        }
        if let Some(value) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = Some(PathBuf::from(value));
            applied += 1;
        }
        if let Some(value) = lookup(ENV_OVERWRITE) {
            self.overwrite = parse_flag(ENV_OVERWRITE, &value)?;
            applied += 1;
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = value;
            applied += 1;
        }
        if let Some(value) = lookup(ENV_LOG_JSON) {
            self.log_json = parse_flag(ENV_LOG_JSON, &value)?;
            applied += 1;
        }

        if applied > 0 {
            debug!(count = applied, "applied environment overrides");
        }
        Ok(())
    }

    /// Command-line values win over everything else
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.log_level {
            self.log_level = level.clone();
        }
        if overrides.log_json {
            self.log_json = true;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = Some(dir.clone());
        }
        if overrides.overwrite {
            self.overwrite = true;
        }
        if let Some(lookback) = overrides.lookback_seconds {
            self.lookback_seconds = lookback;
        }
    }

    pub fn validate(&self) -> KeyTrimResult<()> {
        if !self.lookback_seconds.is_finite() || self.lookback_seconds <= 0.0 {
            return Err(KeyTrimError::config(format!(
                "lookback_seconds must be a positive number, got {}",
                self.lookback_seconds
            )));
        }
        if self.ffmpeg_path.as_os_str().is_empty() || self.ffprobe_path.as_os_str().is_empty() {
            return Err(KeyTrimError::config("tool paths must not be empty"));
        }
        validate_log_level(&self.log_level)
    }
}

fn parse_flag(name: &str, value: &str) -> KeyTrimResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(KeyTrimError::config(format!(
            "{} must be a boolean, got {}",
            name, value
        ))),
    }
}
