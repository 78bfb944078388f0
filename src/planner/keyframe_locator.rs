//! Keyframe lookup inside a search window

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::domain::model::{KeyframeSet, SearchWindow};
use crate::error::KeyTrimResult;
use crate::ports::KeyframeProbePort;

/// Thin query over the keyframe probe
pub struct KeyframeLocator {
    probe: Arc<dyn KeyframeProbePort>,
}

impl KeyframeLocator {
    pub fn new(probe: Arc<dyn KeyframeProbePort>) -> Self {
        Self { probe }
    }

    /// Keyframes of `path` inside `window`, ascending.
    ///
    /// Probe failures propagate as `ProbeFailure`; a window without
    /// keyframes yields an empty set.
    pub fn locate(&self, path: &Path, window: &SearchWindow) -> KeyTrimResult<KeyframeSet> {
        let timestamps = self.probe.keyframe_timestamps(path, window)?;
        debug!(
            source = %path.display(),
            window = %window,
            count = timestamps.len(),
            "located keyframes"
        );
        Ok(KeyframeSet::new(timestamps))
    }
}
