//! # vrindex
//!
//! Index a VR video library into a DeoVR-compatible JSON manifest.
//!
//! `vrindex` walks a directory tree of video files, probes each file for
//! duration, resolution, and codec via `ffprobe`, drops files below
//! configurable size/duration thresholds, and writes a manifest in the
//! [DeoVR deeplink format](https://deovr.com/app/doc#multiple-videos-deeplink)
//! that the player fetches over HTTP to browse and stream the library.
//!
//! ## Quick Start
//!
//! ### Index a library once
//!
//! ```no_run
//! use vrindex::{Indexer, Settings};
//!
//! let settings = Settings::new("/srv/videos")
//!     .with_base_url("https://media.example.com/vr")
//!     .with_interval_secs(0);
//! let report = Indexer::new(settings).unwrap().run_once().unwrap();
//! println!("{} scenes indexed", report.scenes_written);
//! ```
//!
//! ### Keep the manifest fresh
//!
//! ```no_run
//! use vrindex::{Indexer, Settings};
//!
//! // Rescan every five minutes until the process is terminated.
//! let settings = Settings::new("/srv/videos").with_interval_secs(300);
//! Indexer::new(settings).unwrap().run().unwrap();
//! ```
//!
//! ## Pipeline
//!
//! One synchronous, single-threaded pass per cycle:
//!
//! 1. **Walk** — [`VideoWalker`] recursively enumerates files matching
//!    the extension allowlist; unreadable entries are logged and skipped.
//! 2. **Probe** — a [`Prober`] (by default [`FfprobeProber`], an
//!    `ffprobe` subprocess) extracts duration, dimensions, and codec into
//!    a validated [`MediaFile`]; a corrupt file is logged and excluded,
//!    never fatal.
//! 3. **Filter** — files below the size or duration floor are dropped;
//!    a threshold of zero disables that dimension.
//! 4. **Assemble** — [`Manifest::assemble`] sorts entries by relative
//!    path and groups them by top-level subdirectory into DeoVR tabs.
//! 5. **Write** — the JSON is written to a temporary file and atomically
//!    renamed over the destination, so a concurrently-reading web server
//!    never sees a partial manifest and the previous manifest survives
//!    any failed write.
//!
//! The manifest is a pure function of the directory state and the
//! [`Settings`] value: reruns over an unchanged tree are byte-identical.
//!
//! ## Requirements
//!
//! `ffprobe` (part of FFmpeg) must be installed and on `PATH`.
//! Diagnostics go through the [`log`](https://crates.io/crates/log)
//! facade; the bundled CLI installs `env_logger`.

pub mod error;
pub mod indexer;
pub mod manifest;
pub mod media;
pub mod probe;
pub mod settings;
pub mod walker;
pub mod writer;

pub use error::VrIndexError;
pub use indexer::{Indexer, ScanReport};
pub use manifest::{Manifest, Scene, SceneGroup, ScreenType, StereoMode, ROOT_GROUP};
pub use media::MediaFile;
pub use probe::{FfprobeProber, Prober, VideoMetadata};
pub use settings::{
    parse_extension_list, Settings, DEFAULT_EXTENSIONS, DEFAULT_INTERVAL_SECS,
    DEFAULT_MIN_DURATION_SECS, DEFAULT_MIN_SIZE_MB, DEFAULT_OUTPUT_NAME,
};
pub use walker::VideoWalker;
pub use writer::write_manifest;
