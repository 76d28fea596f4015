//! Recursive discovery of candidate video files.
//!
//! [`VideoWalker`] lazily walks the library root and yields files whose
//! extension is in the configured allowlist. Entries that cannot be read
//! (permission errors, dangling symlinks, transient I/O failures) are
//! logged at warn level and skipped — a broken subdirectory never aborts a
//! scan. Only a missing or non-directory root is fatal.

use std::path::{Path, PathBuf};

use log::warn;
use walkdir::WalkDir;

use crate::error::VrIndexError;

/// Lazy iterator over video files beneath a root directory.
///
/// Traverses the full subtree with no depth limit, following symlinks.
/// Extension matching is case-insensitive against the lowercase allowlist.
///
/// # Example
///
/// ```no_run
/// use vrindex::VideoWalker;
///
/// let walker = VideoWalker::new("/srv/videos", &["mp4".into(), "mkv".into()])?;
/// for path in walker {
///     println!("{}", path.display());
/// }
/// # Ok::<(), vrindex::VrIndexError>(())
/// ```
pub struct VideoWalker {
    entries: walkdir::IntoIter,
    extensions: Vec<String>,
}

impl VideoWalker {
    /// Create a walker over `root`, keeping files matching `extensions`.
    ///
    /// `extensions` must already be lowercase without leading dots, as
    /// produced by [`Settings::with_extensions`](crate::Settings::with_extensions).
    ///
    /// # Errors
    ///
    /// Returns [`VrIndexError::InvalidRoot`] if `root` does not exist or is
    /// not a directory.
    pub fn new<P: AsRef<Path>>(root: P, extensions: &[String]) -> Result<Self, VrIndexError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(VrIndexError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }

        Ok(Self {
            entries: WalkDir::new(root).follow_links(true).into_iter(),
            extensions: extensions.to_vec(),
        })
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|allowed| *allowed == e))
    }
}

impl Iterator for VideoWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(error) => {
                    // Per-entry failures are recoverable; keep walking.
                    warn!("skipping unreadable entry: {error}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if self.matches(entry.path()) {
                return Some(entry.into_path());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::VideoWalker;

    fn touch(path: &std::path::Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn extensions() -> Vec<String> {
        vec!["mp4".into(), "mkv".into()]
    }

    #[test]
    fn walks_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.mp4"));
        touch(&dir.path().join("movies/b.MP4"));
        touch(&dir.path().join("movies/deep/c.mkv"));
        touch(&dir.path().join("movies/ignored.txt"));
        touch(&dir.path().join("noext"));

        let mut found: Vec<_> = VideoWalker::new(dir.path(), &extensions())
            .unwrap()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        found.sort();

        assert_eq!(found.len(), 3);
        assert_eq!(found[0], std::path::Path::new("a.mp4"));
        assert_eq!(found[1], std::path::Path::new("movies/b.MP4"));
        assert_eq!(found[2], std::path::Path::new("movies/deep/c.mkv"));
    }

    #[test]
    fn missing_root_is_fatal() {
        let result = VideoWalker::new("/definitely/not/a/real/path", &extensions());
        assert!(result.is_err());
    }

    #[test]
    fn file_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.mp4");
        touch(&file);
        assert!(VideoWalker::new(&file, &extensions()).is_err());
    }
}
