//! FFmpeg execution adapter
//!
//! Performs stream-copy extraction with the system `ffmpeg`. The seek is an
//! input option, so output timestamps restart at the seek point and `-t`
//! measures from there.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::adapters::process_std::{describe_status, output_tail};
use crate::error::{KeyTrimError, KeyTrimResult};
use crate::ports::{ProcessRunner, StreamCopyArgs, TranscodePort};

/// FFmpeg-based execution adapter
pub struct FfmpegAdapter {
    ffmpeg: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl FfmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(ffmpeg: impl Into<PathBuf>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            runner,
        }
    }

    /// Full argument list for one stream-copy extraction
    pub fn build_args(request: &StreamCopyArgs) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-nostdin".into()];
        args.push(if request.overwrite { "-y" } else { "-n" }.into());

        if let Some(seek) = request.effective_seek() {
            args.push("-ss".into());
            args.push(seek.to_string().into());
        }

        args.push("-i".into());
        args.push(request.input.as_os_str().to_os_string());

        if let Some(duration) = request.duration {
            args.push("-t".into());
            args.push(duration.to_string().into());
        }

        for arg in [
            "-c",
            "copy",
            "-movflags",
            "+faststart",
            "-avoid_negative_ts",
            "make_zero",
        ] {
            args.push(arg.into());
        }

        args.push(request.output.as_os_str().to_os_string());
        args
    }
}

impl TranscodePort for FfmpegAdapter {
    fn stream_copy(&self, request: &StreamCopyArgs) -> KeyTrimResult<()> {
        let failure = |message: String| KeyTrimError::TranscodeFailure {
            source_path: request.input.clone(),
            destination: request.output.clone(),
            message,
        };

        let args = Self::build_args(request);
        debug!(ffmpeg = %self.ffmpeg.display(), ?args, "running stream copy");

        let output = self
            .runner
            .run(&self.ffmpeg, &args)
            .map_err(|e| failure(format!("could not launch {}: {}", self.ffmpeg.display(), e)))?;

        if output.success() {
            Ok(())
        } else {
            Err(failure(format!(
                "{}: {}",
                describe_status(output.status_code),
                output_tail(&output.stderr, 5)
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ProcessOutput;
    use crate::test_support::ScriptedRunner;

    fn rendered(request: &StreamCopyArgs) -> Vec<String> {
        FfmpegAdapter::build_args(request)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_full_argument_list() {
        let request = StreamCopyArgs::new("in.mp4", "out.mp4")
            .with_seek(Some(10.5))
            .with_duration(Some(72.5));
        assert_eq!(
            rendered(&request),
            vec![
                "-hide_banner", "-nostdin", "-n", "-ss", "10.5", "-i", "in.mp4", "-t", "72.5",
                "-c", "copy", "-movflags", "+faststart", "-avoid_negative_ts", "make_zero",
                "out.mp4",
            ]
        );
    }

    #[test]
    fn test_seek_omitted_for_unset_or_zero_start() {
        for seek in [None, Some(0.0)] {
            let args = rendered(&StreamCopyArgs::new("in.mp4", "out.mp4").with_seek(seek));
            assert!(!args.contains(&"-ss".to_string()));
            assert!(!args.contains(&"-t".to_string()));
        }
    }

    #[test]
    fn test_overwrite_flag() {
        let args = rendered(&StreamCopyArgs::new("in.mp4", "out.mp4").with_overwrite(true));
        assert_eq!(args[2], "-y");
    }

    #[test]
    fn test_non_zero_exit_is_transcode_failure() {
        let runner = Arc::new(ScriptedRunner::new(vec![Ok(ProcessOutput {
            status_code: Some(1),
            stdout: String::new(),
            stderr: "File 'out.mp4' already exists. Exiting.\n".to_string(),
        })]));
        let adapter = FfmpegAdapter::new("ffmpeg", runner);
        let err = adapter
            .stream_copy(&StreamCopyArgs::new("in.mp4", "out.mp4"))
            .unwrap_err();
        match err {
            KeyTrimError::TranscodeFailure { destination, message, .. } => {
                assert_eq!(destination, PathBuf::from("out.mp4"));
                assert!(message.contains("already exists"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_success_invokes_configured_binary() {
        let runner = Arc::new(ScriptedRunner::succeeding(""));
        let adapter = FfmpegAdapter::new("/usr/local/bin/ffmpeg", runner.clone());
        adapter
            .stream_copy(&StreamCopyArgs::new("in.mp4", "out.mp4"))
            .unwrap();
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, PathBuf::from("/usr/local/bin/ffmpeg"));
    }
}
