//! Batch planning: pairing sources with markers and naming outputs

use std::collections::HashSet;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::slice;

use tracing::{debug, warn};

use crate::domain::model::{format_time_code, TimeCode};
use crate::error::{KeyTrimError, KeyTrimResult};
use crate::planner::{TrimPlan, TrimPointResolver};

/// One source paired with its raw start/end markers
#[derive(Debug, Clone, PartialEq)]
pub struct TrimRequest {
    pub source: PathBuf,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Builds trim plans for a list of recordings
pub struct BatchTrimPlanner {
    resolver: TrimPointResolver,
    output_dir: Option<PathBuf>,
}

impl BatchTrimPlanner {
    /// Outputs go to `output_dir`, or next to each source when unset
    pub fn new(resolver: TrimPointResolver, output_dir: Option<PathBuf>) -> Self {
        Self {
            resolver,
            output_dir,
        }
    }

    pub fn resolver(&self) -> &TrimPointResolver {
        &self.resolver
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Pair `videos` with `starts` and `ends` by position.
    ///
    /// Marker lists may be shorter than `videos`; missing positions mean no
    /// trim on that side. Nothing is probed until the sequence is iterated.
    pub fn plan(&self, videos: &[PathBuf], starts: &[String], ends: &[String]) -> PlanSequence<'_> {
        if starts.len() > videos.len() || ends.len() > videos.len() {
            warn!(
                videos = videos.len(),
                starts = starts.len(),
                ends = ends.len(),
                "more markers than videos, extra markers are ignored"
            );
        }

        let requests = videos
            .iter()
            .enumerate()
            .map(|(index, source)| TrimRequest {
                source: source.clone(),
                start: starts.get(index).cloned(),
                end: ends.get(index).cloned(),
            })
            .collect();

        PlanSequence {
            planner: self,
            requests,
        }
    }

    /// Resolve a single request into a plan
    pub fn plan_one(&self, request: &TrimRequest) -> KeyTrimResult<TrimPlan> {
        let start = TimeCode::parse_opt(request.start.as_deref())?;
        let end = TimeCode::parse_opt(request.end.as_deref())?;

        let start_seconds = match start {
            Some(requested) => self
                .resolver
                .resolve_start(&request.source, requested.as_seconds())?,
            None => None,
        };
        let requested_end = end.map(|tc| tc.as_seconds());
        let duration_seconds = TrimPointResolver::resolve_duration(requested_end, start_seconds);
        let destination_path = self.destination_for(&request.source, start_seconds, requested_end);

        debug!(
            source = %request.source.display(),
            start = ?start_seconds,
            duration = ?duration_seconds,
            destination = %destination_path.display(),
            "planned trim"
        );

        Ok(TrimPlan {
            source_path: request.source.clone(),
            start_seconds,
            duration_seconds,
            requested_end,
            destination_path,
        })
    }

    /// `{stem}-[{start}-{end}].{ext}`, with empty text for an absent bound
    pub fn destination_for(&self, source: &Path, start: Option<f64>, end: Option<f64>) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let name = format!(
            "{}-[{}-{}]",
            stem,
            format_time_code(start).unwrap_or_default(),
            format_time_code(end).unwrap_or_default()
        );
        let file_name = match source.extension() {
            Some(ext) => format!("{}.{}", name, ext.to_string_lossy()),
            None => name,
        };

        let dir = self
            .output_dir
            .clone()
            .or_else(|| source.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(file_name)
    }
}

/// Lazy, restartable sequence of plans in input order
pub struct PlanSequence<'a> {
    planner: &'a BatchTrimPlanner,
    requests: Vec<TrimRequest>,
}

impl<'a> PlanSequence<'a> {
    /// Fresh pass over the requests; every pass re-plans from scratch
    pub fn iter(&self) -> PlanIter<'_> {
        PlanIter {
            planner: self.planner,
            requests: self.requests.iter(),
            issued: HashSet::new(),
        }
    }

    pub fn requests(&self) -> &[TrimRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl<'s, 'a> IntoIterator for &'s PlanSequence<'a> {
    type Item = KeyTrimResult<TrimPlan>;
    type IntoIter = PlanIter<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator resolving one request per step.
///
/// A plan whose destination was already issued earlier in the same pass is
/// yielded as `DuplicateDestination`, so no two trims write the same file.
pub struct PlanIter<'s> {
    planner: &'s BatchTrimPlanner,
    requests: slice::Iter<'s, TrimRequest>,
    issued: HashSet<PathBuf>,
}

impl<'s> PlanIter<'s> {
    /// Request the next call to `next` will plan
    pub fn peek_request(&self) -> Option<&'s TrimRequest> {
        self.requests.clone().next()
    }
}

impl<'s> Iterator for PlanIter<'s> {
    type Item = KeyTrimResult<TrimPlan>;

    fn next(&mut self) -> Option<Self::Item> {
        let request = self.requests.next()?;
        let plan = match self.planner.plan_one(request) {
            Ok(plan) => plan,
            Err(e) => return Some(Err(e)),
        };

        if self.issued.insert(plan.destination_path.clone()) {
            Some(Ok(plan))
        } else {
            warn!(
                source = %plan.source_path.display(),
                destination = %plan.destination_path.display(),
                "destination already used in this batch"
            );
            Some(Err(KeyTrimError::DuplicateDestination {
                source_path: plan.source_path,
                destination: plan.destination_path,
            }))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.requests.size_hint()
    }
}

impl ExactSizeIterator for PlanIter<'_> {}

impl FusedIterator for PlanIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::KeyframeLocator;
    use crate::test_support::FakeProbe;
    use std::sync::Arc;

    fn planner(probe: Arc<FakeProbe>, output_dir: Option<&str>) -> BatchTrimPlanner {
        let resolver = TrimPointResolver::new(KeyframeLocator::new(probe));
        BatchTrimPlanner::new(resolver, output_dir.map(PathBuf::from))
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn markers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_missing_markers_mean_no_trim() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![55.0, 58.5]));
        let planner = planner(probe, Some("out"));
        let sequence = planner.plan(&paths(&["a.mp4", "b.mp4"]), &markers(&["1:00"]), &[]);

        let plans: Vec<TrimPlan> = sequence.iter().collect::<KeyTrimResult<_>>().unwrap();
        assert_eq!(plans.len(), 2);

        assert_eq!(plans[0].start_seconds, Some(58.5));
        assert_eq!(plans[0].duration_seconds, None);
        assert_eq!(plans[0].destination_path, PathBuf::from("out/a-[58.500-].mp4"));

        assert_eq!(plans[1].start_seconds, None);
        assert_eq!(plans[1].duration_seconds, None);
        assert_eq!(plans[1].destination_path, PathBuf::from("out/b-[-].mp4"));
    }

    #[test]
    fn test_destination_without_start() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![]));
        let planner = planner(probe.clone(), None);
        let sequence = planner.plan(&paths(&["/rec/clip.mp4"]), &[], &markers(&["83"]));
        let plan = sequence.iter().next().unwrap().unwrap();

        assert_eq!(plan.destination_path, PathBuf::from("/rec/clip-[-1:23.000].mp4"));
        assert_eq!(plan.duration_seconds, Some(83.0));
        assert_eq!(probe.query_count(), 0);
    }

    #[test]
    fn test_duration_is_relative_to_resolved_start() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![10.0, 10.5, 12.0]));
        let planner = planner(probe, Some("out"));
        let videos = paths(&["show.ts"]);
        let sequence = planner.plan(&videos, &markers(&["11"]), &markers(&["1:00:00"]));
        let plan = sequence.iter().next().unwrap().unwrap();

        assert_eq!(plan.start_seconds, Some(10.5));
        assert_eq!(plan.requested_end, Some(3600.0));
        assert_eq!(plan.duration_seconds, Some(3589.5));
        assert_eq!(
            plan.destination_path,
            PathBuf::from("out/show-[10.500-1:00:00.000].ts")
        );
    }

    #[test]
    fn test_no_keyframe_in_window_trims_from_file_start() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![]));
        let planner = planner(probe, Some("out"));
        let sequence = planner.plan(&paths(&["a.mkv"]), &markers(&["30"]), &[]);
        let plan = sequence.iter().next().unwrap().unwrap();
        assert_eq!(plan.start_seconds, None);
        assert_eq!(plan.destination_path, PathBuf::from("out/a-[-].mkv"));
    }

    #[test]
    fn test_source_without_extension() {
        let planner = planner(Arc::new(FakeProbe::with_keyframes(vec![])), Some("out"));
        let dest = planner.destination_for(Path::new("rec/raw"), None, Some(5.0));
        assert_eq!(dest, PathBuf::from("out/raw-[-5.000]"));
    }

    #[test]
    fn test_sequence_is_lazy_and_restartable() {
        let probe = Arc::new(FakeProbe::with_keyframes(vec![5.0]));
        let planner = planner(probe.clone(), Some("out"));
        let videos = paths(&["a.mp4", "b.mp4"]);
        let sequence = planner.plan(&videos, &markers(&["10", "20"]), &[]);
        assert_eq!(probe.query_count(), 0);

        let first: Vec<_> = sequence.iter().collect();
        assert_eq!(probe.query_count(), 2);

        let second: Vec<_> = (&sequence).into_iter().collect();
        assert_eq!(probe.query_count(), 4);

        assert_eq!(first.len(), second.len());
        assert_eq!(first[1].as_ref().unwrap(), second[1].as_ref().unwrap());
    }

    #[test]
    fn test_malformed_marker_fails_only_its_item() {
        let planner = planner(Arc::new(FakeProbe::with_keyframes(vec![1.0])), Some("out"));
        let videos = paths(&["a.mp4", "b.mp4"]);
        let sequence = planner.plan(&videos, &markers(&["1:2:3:4", "5"]), &[]);
        let results: Vec<_> = sequence.iter().collect();
        assert!(matches!(results[0], Err(KeyTrimError::MalformedTimeCode { .. })));
        assert_eq!(results[1].as_ref().unwrap().start_seconds, Some(1.0));
    }

    #[test]
    fn test_extra_markers_are_ignored() {
        let planner = planner(Arc::new(FakeProbe::with_keyframes(vec![])), Some("out"));
        let starts = markers(&["", "5"]);
        let ends = markers(&["0", "9"]);
        let sequence = planner.plan(&paths(&["a.mp4"]), &starts, &ends);
        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence.iter().len(), 1);
        let plan = sequence.iter().next().unwrap().unwrap();
        assert_eq!(plan.start_seconds, None);
        assert_eq!(plan.duration_seconds, None);
    }

    #[test]
    fn test_same_stem_in_one_output_dir_fails_later_item() {
        let planner = planner(Arc::new(FakeProbe::with_keyframes(vec![])), Some("out"));
        let sequence = planner.plan(&paths(&["day1/show.mp4", "day2/show.mp4"]), &[], &[]);

        let results: Vec<_> = sequence.iter().collect();
        assert_eq!(
            results[0].as_ref().unwrap().destination_path,
            PathBuf::from("out/show-[-].mp4")
        );
        match &results[1] {
            Err(KeyTrimError::DuplicateDestination {
                source_path,
                destination,
            }) => {
                assert_eq!(source_path, &PathBuf::from("day2/show.mp4"));
                assert_eq!(destination, &PathBuf::from("out/show-[-].mp4"));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // a fresh pass starts with no destinations issued
        assert!(sequence.iter().next().unwrap().is_ok());
    }

    #[test]
    fn test_repeated_source_with_different_markers_is_allowed() {
        let planner = planner(Arc::new(FakeProbe::with_keyframes(vec![])), None);
        let videos = paths(&["rec/a.mp4", "rec/a.mp4", "rec/a.mp4"]);
        let ends = markers(&["10", "20", "10"]);
        let results: Vec<_> = planner.plan(&videos, &[], &ends).iter().collect();

        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(matches!(
            results[2],
            Err(KeyTrimError::DuplicateDestination { .. })
        ));
    }
}
