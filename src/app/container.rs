use std::sync::Arc;

use crate::adapters::{FfmpegAdapter, FfprobeAdapter, SystemProcessRunner};
use crate::config::TrimConfig;
use crate::engine::TrimExecutor;
use crate::planner::{BatchTrimPlanner, KeyframeLocator, TrimPointResolver};
use crate::ports::{KeyframeProbePort, ProcessRunner, TranscodePort};

/// Explicit context object holding the wired components of one run
pub struct AppContainer {
    config: TrimConfig,
    planner: BatchTrimPlanner,
    executor: TrimExecutor,
}

impl AppContainer {
    /// Wire the ffprobe/ffmpeg adapters described by `config`
    pub fn from_config(config: TrimConfig) -> Self {
        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemProcessRunner::new());
        let probe = Arc::new(FfprobeAdapter::new(
            config.ffprobe_path.clone(),
            Arc::clone(&runner),
        ));
        let transcoder = Arc::new(FfmpegAdapter::new(config.ffmpeg_path.clone(), runner));

        Self::with_ports(config, probe, transcoder)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        config: TrimConfig,
        probe: Arc<dyn KeyframeProbePort>,
        transcoder: Arc<dyn TranscodePort>,
    ) -> Self {
        let resolver = TrimPointResolver::new(KeyframeLocator::new(probe))
            .with_lookback(config.lookback_seconds);
        let planner = BatchTrimPlanner::new(resolver, config.output_dir.clone());
        let executor = TrimExecutor::new(transcoder).with_overwrite(config.overwrite);

        Self {
            config,
            planner,
            executor,
        }
    }

    pub fn config(&self) -> &TrimConfig {
        &self.config
    }

    pub fn planner(&self) -> &BatchTrimPlanner {
        &self.planner
    }

    pub fn executor(&self) -> &TrimExecutor {
        &self.executor
    }
}
