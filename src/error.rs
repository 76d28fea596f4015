//! Error types for the `vrindex` crate.
//!
//! This module defines [`VrIndexError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry enough context to
//! diagnose the problem — file paths and upstream error messages — without
//! extra logging at the call site.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for all `vrindex` operations.
///
/// Every public method that can fail returns `Result<T, VrIndexError>`.
///
/// Variants split into two severity classes:
///
/// - **Fatal configuration errors** — [`InvalidRoot`], [`InvalidOutputDir`],
///   and [`ProberNotFound`] abort the process before any manifest is
///   written.
/// - **Recoverable per-file errors** — [`ProbeFailed`] and
///   [`NoVideoStream`] exclude a single file from the manifest; the scan
///   continues.
///
/// [`WriteFailed`] sits in between: fatal for a one-shot run, but a looping
/// indexer logs it and retries on the next iteration (see
/// [`VrIndexError::is_transient`]).
///
/// [`InvalidRoot`]: VrIndexError::InvalidRoot
/// [`InvalidOutputDir`]: VrIndexError::InvalidOutputDir
/// [`ProberNotFound`]: VrIndexError::ProberNotFound
/// [`ProbeFailed`]: VrIndexError::ProbeFailed
/// [`NoVideoStream`]: VrIndexError::NoVideoStream
/// [`WriteFailed`]: VrIndexError::WriteFailed
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VrIndexError {
    /// The configured root directory does not exist or is not a directory.
    #[error("{path} is not a valid directory", path = .path.display())]
    InvalidRoot {
        /// The path that was configured as the library root.
        path: PathBuf,
    },

    /// The configured output directory is not a directory.
    #[error("output directory {path} is not a valid directory", path = .path.display())]
    InvalidOutputDir {
        /// The configured output directory.
        path: PathBuf,
    },

    /// No `ffprobe` executable could be located on `PATH`.
    #[error("ffprobe executable not found on PATH (install FFmpeg or set an explicit path)")]
    ProberNotFound,

    /// A media file could not be probed.
    #[error("failed to probe {path}: {reason}", path = .path.display())]
    ProbeFailed {
        /// The file that was being probed.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// The probed file carries no usable video stream.
    #[error("no video stream found in {path}", path = .path.display())]
    NoVideoStream {
        /// The file that was being probed.
        path: PathBuf,
    },

    /// The manifest could not be written to its destination.
    ///
    /// A previously written manifest at the same path is left intact.
    #[error("failed to write manifest to {path}: {reason}", path = .path.display())]
    WriteFailed {
        /// The destination manifest path.
        path: PathBuf,
        /// Underlying reason the write failed.
        reason: String,
    },

    /// Manifest serialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VrIndexError {
    /// Returns `true` for errors a looping indexer should survive.
    ///
    /// Only [`WriteFailed`](VrIndexError::WriteFailed) qualifies: a
    /// transient write failure (full disk, permissions flap) must not kill
    /// a long-running service, and the previous manifest stays valid until
    /// a later iteration succeeds.
    pub fn is_transient(&self) -> bool {
        matches!(self, VrIndexError::WriteFailed { .. })
    }
}
