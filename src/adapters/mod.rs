// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod process_std;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FfmpegAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use process_std::SystemProcessRunner;
