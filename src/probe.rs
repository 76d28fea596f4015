//! Media metadata probing.
//!
//! Shells out to `ffprobe -v quiet -print_format json -show_format
//! -show_streams` and maps the JSON output into a fixed, validated
//! [`VideoMetadata`] at the boundary, so loosely-typed probe output never
//! propagates through the pipeline. Files whose metadata is incomplete
//! (no video stream, no duration) are rejected with a per-file error.
//!
//! The [`Prober`] trait is the seam the pipeline probes through; tests
//! inject a mock implementation instead of spawning processes.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::VrIndexError;

/// Technical metadata for a single video file.
///
/// Everything the manifest needs and nothing more: duration, dimensions,
/// and the codec label DeoVR displays.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Total duration in seconds.
    pub duration_secs: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Codec name (e.g. `"h264"`, `"hevc"`, `"av1"`).
    pub codec: String,
}

/// A source of per-file video metadata.
///
/// The production implementation is [`FfprobeProber`]; tests substitute a
/// mock so the pipeline can run without media files or FFmpeg installed.
pub trait Prober {
    /// Human-readable name of the probing backend, for log output.
    fn name(&self) -> &'static str;

    /// Probe a single file.
    ///
    /// # Errors
    ///
    /// [`VrIndexError::ProbeFailed`] when the file cannot be inspected
    /// (corrupt file, unsupported format, I/O error) and
    /// [`VrIndexError::NoVideoStream`] when it carries no usable video
    /// stream. Both are recoverable per-file errors: callers log them and
    /// move on to the next file.
    fn probe(&self, path: &Path) -> Result<VideoMetadata, VrIndexError>;
}

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: PathBuf,
}

impl FfprobeProber {
    /// Create a prober using the given ffprobe binary.
    pub fn new<P: Into<PathBuf>>(ffprobe_path: P) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Create a prober that finds ffprobe on `PATH`.
    ///
    /// # Errors
    ///
    /// [`VrIndexError::ProberNotFound`] when no ffprobe binary is
    /// available. This is a fatal configuration error — without a prober
    /// no manifest can be produced.
    pub fn from_path() -> Result<Self, VrIndexError> {
        which::which("ffprobe")
            .map(|p| Self { ffprobe_path: p })
            .map_err(|_| VrIndexError::ProberNotFound)
    }
}

impl Prober for FfprobeProber {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn probe(&self, path: &Path) -> Result<VideoMetadata, VrIndexError> {
        let probe_failed = |reason: String| VrIndexError::ProbeFailed {
            path: path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams"])
            .arg(path)
            .output()
            .map_err(|e| probe_failed(format!("failed to spawn ffprobe: {e}")))?;

        if !output.status.success() {
            return Err(probe_failed(format!(
                "ffprobe exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed: FfprobeOutput = serde_json::from_str(&stdout)
            .map_err(|e| probe_failed(format!("ffprobe JSON parse error: {e}")))?;

        parse_ffprobe_output(path, parsed)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_ffprobe_output(path: &Path, output: FfprobeOutput) -> Result<VideoMetadata, VrIndexError> {
    let video = output
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| VrIndexError::NoVideoStream {
            path: path.to_path_buf(),
        })?;

    // Container-level duration is authoritative; some containers (raw TS
    // captures, for instance) only report it on the stream.
    let duration_secs = output
        .format
        .duration
        .as_deref()
        .or(video.duration.as_deref())
        .and_then(parse_seconds)
        .ok_or_else(|| VrIndexError::ProbeFailed {
            path: path.to_path_buf(),
            reason: "no duration reported".into(),
        })?;

    let (width, height) = match (video.width, video.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(VrIndexError::ProbeFailed {
                path: path.to_path_buf(),
                reason: "no video dimensions reported".into(),
            });
        }
    };

    Ok(VideoMetadata {
        duration_secs,
        width,
        height,
        codec: video.codec_name.clone().unwrap_or_else(|| "unknown".into()),
    })
}

fn parse_seconds(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|d| d.is_finite() && *d > 0.0)
}
