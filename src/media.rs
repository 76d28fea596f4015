//! The validated per-file record the pipeline works with.
//!
//! [`MediaFile`] combines filesystem facts (path, size) with probe results
//! (duration, dimensions, codec) into an immutable value. It is created
//! once per discovered file and never mutated afterwards.

use std::path::{Path, PathBuf};

use crate::probe::VideoMetadata;

/// A discovered, probed video file.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct MediaFile {
    /// Full path on disk.
    pub path: PathBuf,
    /// Path relative to the library root; source of title and URL.
    pub relative: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Codec name as reported by the prober.
    pub codec: String,
}

impl MediaFile {
    /// Build a record from a discovered path, its byte size, and its probe
    /// result.
    ///
    /// The relative path is computed against `root`; a path outside the
    /// root (possible through symlinked subtrees) falls back to the file
    /// name alone so URLs stay well-formed.
    pub fn new(root: &Path, path: PathBuf, size: u64, metadata: VideoMetadata) -> Self {
        let relative = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| {
                path.file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| path.clone())
            });

        Self {
            path,
            relative,
            size,
            duration_secs: metadata.duration_secs,
            width: metadata.width,
            height: metadata.height,
            codec: metadata.codec,
        }
    }

    /// Scene title: the file's base name without its extension.
    pub fn title(&self) -> String {
        self.relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Whether the file passes the configured size and duration floors.
    ///
    /// Pure threshold check: a threshold of `0` disables that dimension.
    /// Keep unless `size < min_size_bytes` or
    /// `duration < min_duration_secs`.
    pub fn meets_thresholds(&self, min_size_bytes: u64, min_duration_secs: f64) -> bool {
        if min_size_bytes > 0 && self.size < min_size_bytes {
            return false;
        }
        if min_duration_secs > 0.0 && self.duration_secs < min_duration_secs {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::MediaFile;
    use crate::probe::VideoMetadata;

    fn sample(size: u64, duration_secs: f64) -> MediaFile {
        MediaFile::new(
            Path::new("/library"),
            PathBuf::from("/library/movies/Some Film.mp4"),
            size,
            VideoMetadata {
                duration_secs,
                width: 3840,
                height: 1920,
                codec: "h264".into(),
            },
        )
    }

    #[test]
    fn relative_path_and_title() {
        let file = sample(1, 1.0);
        assert_eq!(file.relative, Path::new("movies/Some Film.mp4"));
        assert_eq!(file.title(), "Some Film");
    }

    #[test]
    fn path_outside_root_keeps_file_name() {
        let file = MediaFile::new(
            Path::new("/library"),
            PathBuf::from("/elsewhere/clip.mp4"),
            1,
            VideoMetadata {
                duration_secs: 1.0,
                width: 1,
                height: 1,
                codec: "h264".into(),
            },
        );
        assert_eq!(file.relative, Path::new("clip.mp4"));
    }

    #[test]
    fn thresholds_keep_large_long_files() {
        let file = sample(20 * 1024 * 1024, 90.0);
        assert!(file.meets_thresholds(10 * 1024 * 1024, 60.0));
    }

    #[test]
    fn thresholds_drop_small_or_short_files() {
        assert!(!sample(2 * 1024 * 1024, 90.0).meets_thresholds(10 * 1024 * 1024, 60.0));
        assert!(!sample(20 * 1024 * 1024, 10.0).meets_thresholds(10 * 1024 * 1024, 60.0));
    }

    #[test]
    fn zero_disables_a_threshold_dimension() {
        let tiny = sample(1, 1.0);
        assert!(tiny.meets_thresholds(0, 0.0));
        assert!(tiny.meets_thresholds(0, 0.5));
        assert!(!tiny.meets_thresholds(0, 2.0));
        assert!(!tiny.meets_thresholds(2, 0.0));
    }

    #[test]
    fn boundary_values_are_kept() {
        // Thresholds are floors: exactly-at-threshold files stay.
        let file = sample(10 * 1024 * 1024, 60.0);
        assert!(file.meets_thresholds(10 * 1024 * 1024, 60.0));
    }
}
