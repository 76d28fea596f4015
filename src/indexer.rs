//! Pipeline orchestration.
//!
//! [`Indexer`] runs the whole scan → probe → filter → assemble → write
//! pipeline, either once ([`Indexer::run_once`]) or on a sleep loop. The
//! loop's sleep is injectable ([`Indexer::run_loop_with`]) so tests can
//! drive iterations without real delays.
//!
//! Everything is single-threaded and synchronous: one file is probed at a
//! time, and the only suspension point is the sleep between loop
//! iterations. Each iteration rebuilds the manifest from a fresh
//! filesystem scan — there is no cache and no state carried across runs.

use std::fs;
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::error::VrIndexError;
use crate::manifest::Manifest;
use crate::media::MediaFile;
use crate::probe::{FfprobeProber, Prober};
use crate::settings::Settings;
use crate::walker::VideoWalker;
use crate::writer::write_manifest;

/// Counters describing a single scan-and-write cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Files matching the extension allowlist.
    pub files_found: usize,
    /// Files skipped because their filesystem metadata was unreadable.
    pub access_failures: usize,
    /// Files skipped because probing failed.
    pub probe_failures: usize,
    /// Files dropped by the size/duration thresholds.
    pub filtered_out: usize,
    /// Scenes written to the manifest.
    pub scenes_written: usize,
}

/// Runs the indexing pipeline against one library.
///
/// # Example
///
/// ```no_run
/// use vrindex::{Indexer, Settings};
///
/// let settings = Settings::new("/srv/videos").with_interval_secs(0);
/// let indexer = Indexer::new(settings)?;
/// let report = indexer.run_once()?;
/// println!("{} scenes indexed", report.scenes_written);
/// # Ok::<(), vrindex::VrIndexError>(())
/// ```
pub struct Indexer {
    settings: Settings,
    prober: Box<dyn Prober>,
}

impl Indexer {
    /// Create an indexer probing through `ffprobe` found on `PATH`.
    ///
    /// # Errors
    ///
    /// Settings validation errors ([`VrIndexError::InvalidRoot`],
    /// [`VrIndexError::InvalidOutputDir`]) come first, then
    /// [`VrIndexError::ProberNotFound`] if ffprobe is missing. All are
    /// fatal: nothing has been written yet.
    pub fn new(settings: Settings) -> Result<Self, VrIndexError> {
        settings.validate()?;
        let prober = FfprobeProber::from_path()?;
        Ok(Self {
            settings,
            prober: Box::new(prober),
        })
    }

    /// Create an indexer with a caller-supplied prober.
    ///
    /// Used by tests to run the pipeline without media files, and by
    /// callers that want a non-default ffprobe binary via
    /// [`FfprobeProber::new`].
    pub fn with_prober(settings: Settings, prober: Box<dyn Prober>) -> Result<Self, VrIndexError> {
        settings.validate()?;
        Ok(Self { settings, prober })
    }

    /// The settings this indexer runs with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one full scan-and-write cycle.
    ///
    /// Per-file failures (unreadable entries, probe errors) are logged and
    /// counted, never fatal. The manifest covers exactly the files that
    /// existed, matched the allowlist, probed cleanly, and passed the
    /// thresholds at scan time.
    ///
    /// # Errors
    ///
    /// [`VrIndexError::InvalidRoot`] if the root vanished since startup,
    /// [`VrIndexError::WriteFailed`] / [`VrIndexError::Json`] if the
    /// manifest could not be written. On write failure a previous manifest
    /// at the destination is left intact.
    pub fn run_once(&self) -> Result<ScanReport, VrIndexError> {
        let settings = &self.settings;
        info!(
            "scanning {} (probe backend: {})",
            settings.root.display(),
            self.prober.name()
        );

        let mut report = ScanReport::default();
        let mut kept: Vec<MediaFile> = Vec::new();

        for path in VideoWalker::new(&settings.root, &settings.extensions)? {
            report.files_found += 1;

            let size = match fs::metadata(&path) {
                Ok(metadata) => metadata.len(),
                Err(error) => {
                    warn!("skipping {}: {error}", path.display());
                    report.access_failures += 1;
                    continue;
                }
            };

            let metadata = match self.prober.probe(&path) {
                Ok(metadata) => metadata,
                Err(error) => {
                    warn!("{error}");
                    report.probe_failures += 1;
                    continue;
                }
            };

            let file = MediaFile::new(&settings.root, path, size, metadata);
            if !file.meets_thresholds(settings.min_size_bytes(), settings.min_duration_secs) {
                debug!(
                    "filtered out {} ({} bytes, {:.1}s)",
                    file.relative.display(),
                    file.size,
                    file.duration_secs
                );
                report.filtered_out += 1;
                continue;
            }

            debug!(
                "+ {} ({}x{} {}, {:.1}s)",
                file.relative.display(),
                file.width,
                file.height,
                file.codec,
                file.duration_secs
            );
            kept.push(file);
        }

        let manifest = Manifest::assemble(&kept, settings);
        report.scenes_written = manifest.scene_count();

        let output_path = settings.output_path();
        write_manifest(&manifest, &output_path)?;

        info!(
            "wrote {} scene(s) to {} ({} found, {} probe failure(s), {} filtered)",
            report.scenes_written,
            output_path.display(),
            report.files_found,
            report.probe_failures,
            report.filtered_out,
        );
        Ok(report)
    }

    /// Run according to the configured interval.
    ///
    /// Interval `0` performs exactly one cycle and returns; a positive
    /// interval loops forever, sleeping between iterations, until the
    /// process is terminated by signal.
    ///
    /// # Errors
    ///
    /// One-shot mode propagates any [`Indexer::run_once`] error. Looping
    /// mode logs transient write failures and keeps going; every other
    /// error propagates.
    pub fn run(&self) -> Result<(), VrIndexError> {
        if self.settings.interval_secs == 0 {
            self.run_once()?;
            return Ok(());
        }

        self.run_loop_with(|interval| {
            info!("sleeping for {} second(s)", interval.as_secs());
            thread::sleep(interval);
            true
        })
    }

    /// Run the loop body repeatedly with a caller-controlled sleep.
    ///
    /// After each iteration, `sleep` receives the configured interval;
    /// returning `false` stops the loop. Production code passes a
    /// [`thread::sleep`] wrapper that always returns `true`; tests drive a
    /// fixed number of iterations with no delay.
    ///
    /// # Errors
    ///
    /// Transient errors (see [`VrIndexError::is_transient`]) are logged
    /// and the loop continues; anything else propagates immediately.
    pub fn run_loop_with<S>(&self, mut sleep: S) -> Result<(), VrIndexError>
    where
        S: FnMut(Duration) -> bool,
    {
        loop {
            match self.run_once() {
                Ok(_) => {}
                Err(error) if error.is_transient() => {
                    error!("iteration failed, previous manifest kept: {error}");
                }
                Err(error) => return Err(error),
            }

            if !sleep(Duration::from_secs(self.settings.interval_secs)) {
                return Ok(());
            }
        }
    }
}
