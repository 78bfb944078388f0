//! Stream-copy trim execution

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::engine::{BatchReport, TrimFailure, TrimOutcome};
use crate::error::KeyTrimResult;
use crate::planner::{PlanSequence, TrimPlan};
use crate::ports::{StreamCopyArgs, TranscodePort};

/// Issues one stream-copy transcode per plan
pub struct TrimExecutor {
    transcoder: Arc<dyn TranscodePort>,
    overwrite: bool,
}

impl TrimExecutor {
    pub fn new(transcoder: Arc<dyn TranscodePort>) -> Self {
        Self {
            transcoder,
            overwrite: false,
        }
    }

    /// Replace existing outputs instead of failing on them
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Transcode request for `plan`
    pub fn request_for(&self, plan: &TrimPlan) -> StreamCopyArgs {
        StreamCopyArgs::new(&plan.source_path, &plan.destination_path)
            .with_seek(plan.start_seconds)
            .with_duration(plan.duration_seconds)
            .with_overwrite(self.overwrite)
    }

    /// Write the trimmed copy for `plan`.
    ///
    /// An empty or inverted range fails with `InvalidRange` before the
    /// transcoder is invoked.
    pub fn execute(&self, plan: &TrimPlan) -> KeyTrimResult<TrimOutcome> {
        plan.validate()?;

        info!(
            source = %plan.source_path.display(),
            destination = %plan.destination_path.display(),
            start = ?plan.start_seconds,
            duration = ?plan.duration_seconds,
            "trimming"
        );

        let started = Instant::now();
        self.transcoder.stream_copy(&self.request_for(plan))?;

        Ok(TrimOutcome {
            source_path: plan.source_path.clone(),
            destination_path: plan.destination_path.clone(),
            start_seconds: plan.start_seconds,
            duration_seconds: plan.duration_seconds,
            elapsed: started.elapsed(),
        })
    }

    /// Plan and execute every item in order.
    ///
    /// A failing item, at planning or execution time, is logged and recorded
    /// and the remaining items still run.
    pub fn run_batch(&self, plans: &PlanSequence<'_>) -> BatchReport {
        let mut report = BatchReport::default();
        let mut items = plans.iter();

        loop {
            let Some(request) = items.peek_request() else {
                break;
            };
            let Some(planned) = items.next() else {
                break;
            };

            match planned.and_then(|plan| self.execute(&plan)) {
                Ok(outcome) => report.succeeded.push(outcome),
                Err(e) => {
                    error!(
                        source = %request.source.display(),
                        error = %e,
                        "trim failed, continuing"
                    );
                    report.failed.push(TrimFailure {
                        source_path: request.source.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        report
    }
}
