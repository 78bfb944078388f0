// Trim interactor - Orchestrates planning and execution of a batch

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::app::container::AppContainer;
use crate::domain::model::{KeyframeSet, TimeCode};
use crate::engine::BatchReport;
use crate::error::KeyTrimResult;
use crate::planner::PlanSequence;

/// Keyframes around a requested start and the start they resolve to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyframeReport {
    pub source_path: PathBuf,
    pub requested: Option<f64>,
    pub lookback_seconds: f64,
    /// Probe window, absent when no start was requested
    pub window: Option<String>,
    pub keyframes: KeyframeSet,
    pub resolved_start: Option<f64>,
}

/// Interactor for the trim, plan and keyframe use cases
pub struct TrimInteractor {
    container: AppContainer,
}

impl TrimInteractor {
    pub fn new(container: AppContainer) -> Self {
        Self { container }
    }

    pub fn container(&self) -> &AppContainer {
        &self.container
    }

    /// Lazy plans for a batch, nothing is probed yet
    pub fn plan(&self, videos: &[PathBuf], starts: &[String], ends: &[String]) -> PlanSequence<'_> {
        self.container.planner().plan(videos, starts, ends)
    }

    /// Plan and trim every video, continuing past failed items.
    ///
    /// Only a missing, uncreatable output directory aborts the batch.
    pub fn trim(
        &self,
        videos: &[PathBuf],
        starts: &[String],
        ends: &[String],
    ) -> KeyTrimResult<BatchReport> {
        if let Some(dir) = self.container.planner().output_dir() {
            std::fs::create_dir_all(dir)?;
        }

        info!(videos = videos.len(), "starting batch trim");
        let plans = self.plan(videos, starts, ends);
        Ok(self.container.executor().run_batch(&plans))
    }

    /// Keyframes in the lookback window before `before`
    pub fn inspect_keyframes(&self, source: &Path, before: &str) -> KeyTrimResult<KeyframeReport> {
        let requested = TimeCode::parse(before)?.map(|tc| tc.as_seconds());
        let resolver = self.container.planner().resolver();
        let lookback_seconds = resolver.lookback_seconds();

        let Some(target) = requested else {
            return Ok(KeyframeReport {
                source_path: source.to_path_buf(),
                requested: None,
                lookback_seconds,
                window: None,
                keyframes: KeyframeSet::default(),
                resolved_start: None,
            });
        };

        let window = resolver.start_window(target);
        let keyframes = resolver.locator().locate(source, &window)?;
        let resolved_start = keyframes.latest_at_or_before(target);

        Ok(KeyframeReport {
            source_path: source.to_path_buf(),
            requested,
            lookback_seconds,
            window: Some(window.to_interval()),
            keyframes,
            resolved_start,
        })
    }
}
