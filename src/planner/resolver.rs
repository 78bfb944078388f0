//! Keyframe-aligned trim point resolution
//!
//! A stream copy can only begin on a keyframe. The start is therefore moved
//! back to the latest keyframe that does not come after the requested time,
//! which skips as little content as possible while keeping the cut valid.

use std::path::Path;

use tracing::{debug, info};

use crate::domain::model::{SearchWindow, DEFAULT_LOOKBACK_SECONDS};
use crate::error::KeyTrimResult;
use crate::planner::KeyframeLocator;

/// Turns approximate start/end times into a codec-safe range
pub struct TrimPointResolver {
    locator: KeyframeLocator,
    lookback_seconds: f64,
}

impl TrimPointResolver {
    pub fn new(locator: KeyframeLocator) -> Self {
        Self {
            locator,
            lookback_seconds: DEFAULT_LOOKBACK_SECONDS,
        }
    }

    /// Set the span of the window searched before the requested start
    pub fn with_lookback(mut self, seconds: f64) -> Self {
        self.lookback_seconds = seconds;
        self
    }

    pub fn locator(&self) -> &KeyframeLocator {
        &self.locator
    }

    pub fn lookback_seconds(&self) -> f64 {
        self.lookback_seconds
    }

    /// Window probed for a start near `target`
    pub fn start_window(&self, target: f64) -> SearchWindow {
        SearchWindow::lookback(target, self.lookback_seconds)
    }

    /// Latest keyframe at or before `target`.
    ///
    /// `None` when the lookback window holds no such keyframe, in which case
    /// the trim starts at the beginning of the file.
    pub fn resolve_start(&self, path: &Path, target: f64) -> KeyTrimResult<Option<f64>> {
        let window = self.start_window(target);
        let keyframes = self.locator.locate(path, &window)?;
        let resolved = keyframes.latest_at_or_before(target);

        match resolved {
            Some(start) => info!(
                source = %path.display(),
                requested = target,
                resolved = start,
                "resolved start keyframe"
            ),
            None => debug!(
                source = %path.display(),
                requested = target,
                window = %window,
                "no keyframe before requested start, trimming from file start"
            ),
        }

        Ok(resolved)
    }

    /// Extraction length for an absolute `end` after a resolved `start`.
    ///
    /// Not clamped: a result <= 0 is a caller error, rejected before
    /// execution.
    pub fn resolve_duration(end: Option<f64>, start: Option<f64>) -> Option<f64> {
        end.map(|end| end - start.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyTrimError;
    use crate::test_support::FakeProbe;
    use std::sync::Arc;

    fn resolver(probe: Arc<FakeProbe>) -> TrimPointResolver {
        TrimPointResolver::new(KeyframeLocator::new(probe))
    }

    #[test]
    fn test_selects_latest_keyframe_not_after_target() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![10.0, 10.5, 12.0]));
        let start = resolver(probe).resolve_start(Path::new("a.mp4"), 11.0).unwrap();
        assert_eq!(start, Some(10.5));
    }

    #[test]
    fn test_empty_keyframe_set_falls_back_to_file_start() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![]));
        let start = resolver(probe).resolve_start(Path::new("a.mp4"), 11.0).unwrap();
        assert_eq!(start, None);
    }

    #[test]
    fn test_window_is_sixty_second_lookback() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![80.0]));
        resolver(probe.clone())
            .resolve_start(Path::new("a.mp4"), 90.0)
            .unwrap();
        resolver(probe.clone())
            .resolve_start(Path::new("a.mp4"), 20.0)
            .unwrap();
        let queries = probe.queries.lock().unwrap();
        assert_eq!(queries[0].1, "30%90");
        assert_eq!(queries[1].1, "0%20");
    }

    #[test]
    fn test_custom_lookback() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![]));
        let resolver = resolver(probe.clone()).with_lookback(10.0);
        assert_eq!(resolver.start_window(25.0).to_interval(), "15%25");
    }

    #[test]
    fn test_probe_failure_propagates() {
        let err = resolver(Arc::new(FakeProbe::failing()))
            .resolve_start(Path::new("a.mp4"), 11.0)
            .unwrap_err();
        assert!(matches!(err, KeyTrimError::ProbeFailure { .. }));
    }

    #[test]
    fn test_resolve_duration() {
        assert_eq!(TrimPointResolver::resolve_duration(Some(100.0), Some(10.5)), Some(89.5));
        assert_eq!(TrimPointResolver::resolve_duration(Some(100.0), None), Some(100.0));
        assert_eq!(TrimPointResolver::resolve_duration(None, Some(10.5)), None);
        assert_eq!(TrimPointResolver::resolve_duration(Some(5.0), Some(10.0)), Some(-5.0));
    }
}
