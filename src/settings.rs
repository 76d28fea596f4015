//! Run configuration.
//!
//! [`Settings`] is the immutable configuration value the whole pipeline
//! reads from. It is built once at startup (from CLI flags and `VRINDEX_*`
//! environment variables in the binary, or programmatically through the
//! `with_*` builders) and then passed by reference to every stage — no
//! ambient global state, so the pipeline stays testable and reentrant.
//!
//! # Example
//!
//! ```no_run
//! use vrindex::{ScreenType, Settings};
//!
//! let settings = Settings::new("/srv/videos")
//!     .with_base_url("https://media.example.com/vr")
//!     .with_min_size_mb(50)
//!     .with_screen_type(ScreenType::Sphere);
//! settings.validate().unwrap();
//! ```

use std::path::PathBuf;

use crate::error::VrIndexError;
use crate::manifest::{ScreenType, StereoMode};

/// File extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 12] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "m2v", "ts",
];

/// Manifest filename used when none is configured.
///
/// DeoVR expects to fetch a file literally named `deovr` from the library
/// root, so the default carries no extension.
pub const DEFAULT_OUTPUT_NAME: &str = "deovr";

/// Default minimum file size in megabytes.
pub const DEFAULT_MIN_SIZE_MB: u64 = 10;

/// Default minimum duration in seconds.
pub const DEFAULT_MIN_DURATION_SECS: f64 = 60.0;

/// Default rescan interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Immutable configuration for an indexing run.
///
/// Created via [`Settings::new`] with the library root, then refined with
/// the `with_*` builders. All fields have the defaults documented on their
/// builders; a default-built value matches the CLI's defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root directory of the video library.
    pub root: PathBuf,
    /// Manifest filename, without any directory component.
    pub output_name: String,
    /// Directory the manifest is written into. `None` writes into `root`.
    pub output_dir: Option<PathBuf>,
    /// Allowed file extensions, lowercase, without leading dots.
    pub extensions: Vec<String>,
    /// URL prefix for generated video URLs. `None` emits relative paths.
    pub base_url: Option<String>,
    /// Thumbnail URL applied to every scene. `None` omits the field.
    pub thumbnail_url: Option<String>,
    /// Minimum file size in megabytes. `0` disables the size filter.
    pub min_size_mb: u64,
    /// Minimum duration in seconds. `0` disables the duration filter.
    pub min_duration_secs: f64,
    /// Seconds between rescans. `0` runs a single scan-and-write cycle.
    pub interval_secs: u64,
    /// Stereo layout stamped on every scene.
    pub stereo_mode: StereoMode,
    /// Projection stamped on every scene.
    pub screen_type: ScreenType,
}

impl Settings {
    /// Create settings for the given library root with all defaults.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            output_dir: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            base_url: None,
            thumbnail_url: None,
            min_size_mb: DEFAULT_MIN_SIZE_MB,
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
            interval_secs: DEFAULT_INTERVAL_SECS,
            stereo_mode: StereoMode::default(),
            screen_type: ScreenType::default(),
        }
    }

    /// Set the manifest filename. Defaults to [`DEFAULT_OUTPUT_NAME`].
    #[must_use]
    pub fn with_output_name<S: Into<String>>(mut self, name: S) -> Self {
        self.output_name = name.into();
        self
    }

    /// Write the manifest into this directory instead of the library root.
    #[must_use]
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Replace the extension allowlist.
    ///
    /// Entries are normalised to lowercase with leading dots stripped, so
    /// `".MP4"` and `"mp4"` are equivalent. Defaults to
    /// [`DEFAULT_EXTENSIONS`].
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Prefix every video URL with this base URL.
    ///
    /// A trailing slash is tolerated. Without a base URL, video URLs are
    /// percent-encoded paths relative to the library root.
    #[must_use]
    pub fn with_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Stamp this thumbnail URL on every scene.
    #[must_use]
    pub fn with_thumbnail_url<S: Into<String>>(mut self, url: S) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Set the minimum file size in megabytes. `0` disables the filter.
    /// Defaults to [`DEFAULT_MIN_SIZE_MB`].
    #[must_use]
    pub fn with_min_size_mb(mut self, megabytes: u64) -> Self {
        self.min_size_mb = megabytes;
        self
    }

    /// Set the minimum duration in seconds. `0` disables the filter.
    /// Defaults to [`DEFAULT_MIN_DURATION_SECS`].
    #[must_use]
    pub fn with_min_duration_secs(mut self, seconds: f64) -> Self {
        self.min_duration_secs = seconds;
        self
    }

    /// Set the rescan interval in seconds. `0` runs once and exits.
    /// Defaults to [`DEFAULT_INTERVAL_SECS`].
    #[must_use]
    pub fn with_interval_secs(mut self, seconds: u64) -> Self {
        self.interval_secs = seconds;
        self
    }

    /// Set the stereo layout stamped on every scene. Defaults to
    /// side-by-side.
    #[must_use]
    pub fn with_stereo_mode(mut self, mode: StereoMode) -> Self {
        self.stereo_mode = mode;
        self
    }

    /// Set the projection stamped on every scene. Defaults to a 180°
    /// equirectangular dome.
    #[must_use]
    pub fn with_screen_type(mut self, screen: ScreenType) -> Self {
        self.screen_type = screen;
        self
    }

    /// Validate the filesystem-facing parts of the configuration.
    ///
    /// # Errors
    ///
    /// [`VrIndexError::InvalidRoot`] if the root is missing or not a
    /// directory; [`VrIndexError::InvalidOutputDir`] if a configured output
    /// directory exists but is not a directory, or does not exist at all.
    pub fn validate(&self) -> Result<(), VrIndexError> {
        if !self.root.is_dir() {
            return Err(VrIndexError::InvalidRoot {
                path: self.root.clone(),
            });
        }
        if let Some(dir) = &self.output_dir {
            if !dir.is_dir() {
                return Err(VrIndexError::InvalidOutputDir { path: dir.clone() });
            }
        }
        Ok(())
    }

    /// Full path the manifest is written to.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .as_deref()
            .unwrap_or(&self.root)
            .join(&self.output_name)
    }

    /// Minimum file size threshold converted to bytes.
    ///
    /// Saturates at `u64::MAX`; the CLI accepts any `u64` megabyte count.
    pub fn min_size_bytes(&self) -> u64 {
        self.min_size_mb.saturating_mul(1024 * 1024)
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Split a comma-separated extension list into normalised entries.
///
/// Used by the CLI for `--ext mp4,mkv` style arguments and the
/// `VRINDEX_EXT` environment variable. Empty segments are dropped.
pub fn parse_extension_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(normalize_extension)
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_extension_list, Settings, DEFAULT_EXTENSIONS};

    #[test]
    fn defaults() {
        let settings = Settings::new("/srv/videos");
        assert_eq!(settings.output_name, "deovr");
        assert_eq!(settings.extensions.len(), DEFAULT_EXTENSIONS.len());
        assert_eq!(settings.min_size_mb, 10);
        assert_eq!(settings.min_duration_secs, 60.0);
        assert_eq!(settings.interval_secs, 60);
        assert!(settings.base_url.is_none());
        assert!(settings.thumbnail_url.is_none());
    }

    #[test]
    fn output_path_defaults_to_root() {
        let settings = Settings::new("/srv/videos");
        assert_eq!(settings.output_path(), Path::new("/srv/videos/deovr"));

        let settings = Settings::new("/srv/videos")
            .with_output_dir("/var/www")
            .with_output_name("library.json");
        assert_eq!(settings.output_path(), Path::new("/var/www/library.json"));
    }

    #[test]
    fn min_size_converts_to_bytes() {
        let settings = Settings::new("/srv/videos").with_min_size_mb(10);
        assert_eq!(settings.min_size_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn min_size_saturates_instead_of_overflowing() {
        let settings = Settings::new("/srv/videos").with_min_size_mb(u64::MAX);
        assert_eq!(settings.min_size_bytes(), u64::MAX);
    }

    #[test]
    fn with_extensions_normalises_entries() {
        let settings = Settings::new("/srv/videos").with_extensions(["mp4", ".MKV", ""]);
        assert_eq!(settings.extensions, vec!["mp4", "mkv"]);
    }

    #[test]
    fn extension_list_parsing() {
        assert_eq!(
            parse_extension_list("mp4, .MKV ,,webm"),
            vec!["mp4", "mkv", "webm"]
        );
        assert!(parse_extension_list("").is_empty());
    }

    #[test]
    fn validate_rejects_missing_root() {
        let settings = Settings::new("/definitely/not/a/real/path");
        assert!(settings.validate().is_err());
    }
}
