//! Atomic manifest writes.
//!
//! DeoVR fetches the manifest over HTTP while this tool regenerates it, so
//! a reader must never observe a half-written file. The manifest is
//! serialized to a temporary file in the destination directory and then
//! renamed over the target; any previously written manifest stays intact
//! until the rename succeeds.

use std::io::Write;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::VrIndexError;
use crate::manifest::Manifest;

/// Serialize `manifest` as pretty-printed JSON and atomically replace
/// `dest` with it.
///
/// # Errors
///
/// [`VrIndexError::WriteFailed`] when the temporary file cannot be
/// created, written, or renamed into place. The destination is never
/// truncated in place, so an existing manifest survives every failure
/// mode. [`VrIndexError::Json`] when serialization itself fails.
pub fn write_manifest(manifest: &Manifest, dest: &Path) -> Result<(), VrIndexError> {
    let json = serde_json::to_string_pretty(manifest)?;

    let write_failed = |reason: String| VrIndexError::WriteFailed {
        path: dest.to_path_buf(),
        reason,
    };

    // The temp file must live in the destination directory: rename is only
    // atomic within a filesystem.
    let dir = dest.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(|e| write_failed(format!("failed to create temporary file: {e}")))?;

    tmp.write_all(json.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| write_failed(format!("failed to write temporary file: {e}")))?;

    tmp.persist(dest)
        .map_err(|e| write_failed(e.to_string()))?;

    debug!("wrote {} bytes to {}", json.len(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::write_manifest;
    use crate::manifest::{Manifest, SceneGroup};

    fn empty_manifest() -> Manifest {
        Manifest {
            scenes: vec![SceneGroup {
                name: "Library".into(),
                list: vec![],
            }],
        }
    }

    #[test]
    fn writes_parsable_json() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("deovr");
        write_manifest(&empty_manifest(), &dest).unwrap();

        let text = fs::read_to_string(&dest).unwrap();
        let parsed: Manifest = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.scenes[0].name, "Library");
    }

    #[test]
    fn replaces_an_existing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("deovr");
        fs::write(&dest, "old contents").unwrap();

        write_manifest(&empty_manifest(), &dest).unwrap();
        let text = fs::read_to_string(&dest).unwrap();
        assert!(text.contains("scenes"));
        assert!(!text.contains("old contents"));
    }

    #[test]
    fn failed_write_leaves_previous_manifest_intact() {
        let dir = tempfile::tempdir().unwrap();
        // Destination whose parent is a regular file: temp-file creation
        // fails before the old manifest could be touched.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "{\"scenes\": []}").unwrap();
        let dest = blocker.join("deovr");

        let error = write_manifest(&empty_manifest(), &dest).unwrap_err();
        assert!(error.is_transient());
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "{\"scenes\": []}");
    }
}
