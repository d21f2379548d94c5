use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Traversal;
use crate::error::{Error, Result};
use crate::types::{Candidate, ImageFormat};

/// Extensions accepted as picture files, compared case-insensitively
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Enumerates picture files below a root directory.
///
/// The scanner holds no open handles itself; every call to [`Scanner::candidates`]
/// starts a fresh walk, so the sequence can be restarted at will.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    traversal: Traversal,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, traversal: Traversal) -> Self {
        Self {
            root: root.into(),
            traversal,
        }
    }

    /// Start a walk over the root.
    ///
    /// Fails with [`Error::SourceUnavailable`] when the root cannot be listed,
    /// before anything is yielded.
    pub fn candidates(&self) -> Result<Candidates> {
        // Probe the root up front; the handle is closed again right away.
        fs::read_dir(&self.root).map_err(|e| Error::source_unavailable(&self.root, e))?;

        let mut walker = WalkDir::new(&self.root).min_depth(1);
        if self.traversal == Traversal::Flat {
            walker = walker.max_depth(1);
        }

        debug!(
            "Scanning {} ({:?})",
            self.root.display(),
            self.traversal
        );

        Ok(Candidates {
            inner: walker.into_iter(),
        })
    }
}

/// Lazy sequence of candidates produced by a [`Scanner`].
///
/// Directory handles are owned by the underlying walker and released when
/// this value is dropped, whether or not the walk ran to the end.
pub struct Candidates {
    inner: walkdir::IntoIter,
}

impl Iterator for Candidates {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    // Unreadable subtrees are skipped, the rest of the walk continues
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            if !has_image_extension(path) {
                debug!("Ignoring non-picture file {}", path.display());
                continue;
            }

            if let Some(candidate) = Candidate::from_path(path) {
                return Some(candidate);
            }
        }
    }
}

/// Convenience wrapper: scan `root` with the given traversal mode
pub fn scan(root: &Path, traversal: Traversal) -> Result<Candidates> {
    Scanner::new(root, traversal).candidates()
}

/// Returns if the given path has a supported picture extension
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ImageFormat::from_extension(ext).is_supported())
        .unwrap_or(false)
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_file(dir: &Path, name: &str) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let file_path = dir.join(name);
        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"DUMMY IMAGE DATA").unwrap();
        file_path
    }

    fn setup_test_directory() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("class-a").join("group-1");

        create_test_file(dir.path(), "1001.png");
        create_test_file(dir.path(), "1002.JPG");
        create_test_file(dir.path(), "1003.jpeg");
        create_test_file(dir.path(), "1004.gif");
        create_test_file(dir.path(), "1005.bmp");
        create_test_file(dir.path(), "notes.txt");
        create_test_file(dir.path(), "README");
        create_test_file(&nested, "2001.png");
        create_test_file(&nested, "2002.tiff");

        dir
    }

    fn sorted_names(candidates: Candidates) -> Vec<String> {
        let mut names: Vec<String> = candidates.map(|c| c.file_name).collect();
        names.sort();
        names
    }

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("test.png")));
        assert!(has_image_extension(Path::new("test.jpg")));
        assert!(has_image_extension(Path::new("test.jpeg")));
        assert!(has_image_extension(Path::new("test.gif")));
        assert!(has_image_extension(Path::new("test.PNG")));
        assert!(!has_image_extension(Path::new("test.bmp")));
        assert!(!has_image_extension(Path::new("test.txt")));
        assert!(!has_image_extension(Path::new("test")));
    }

    #[test]
    fn test_flat_scan_skips_subdirectories() {
        let dir = setup_test_directory();

        let names = sorted_names(scan(dir.path(), Traversal::Flat).unwrap());

        assert_eq!(names, vec!["1001.png", "1002.JPG", "1003.jpeg", "1004.gif"]);
    }

    #[test]
    fn test_recursive_scan_descends() {
        let dir = setup_test_directory();

        let names = sorted_names(scan(dir.path(), Traversal::Recursive).unwrap());

        assert_eq!(
            names,
            vec!["1001.png", "1002.JPG", "1003.jpeg", "1004.gif", "2001.png"]
        );
    }

    #[test]
    fn test_scan_is_restartable() {
        let dir = setup_test_directory();
        let scanner = Scanner::new(dir.path(), Traversal::Flat);

        let first = sorted_names(scanner.candidates().unwrap());
        let second = sorted_names(scanner.candidates().unwrap());

        assert_eq!(first, second);
    }

    #[test]
    fn test_scan_derives_keys() {
        let dir = tempdir().unwrap();
        create_test_file(dir.path(), "a.b.jpg");

        let candidates: Vec<Candidate> = scan(dir.path(), Traversal::Flat).unwrap().collect();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].key, "a.b");
        assert_eq!(candidates[0].extension, "jpg");
        assert_eq!(candidates[0].path, dir.path().join("a.b.jpg"));
    }

    #[test]
    fn test_directory_with_image_name_is_not_a_candidate() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("3001.png")).unwrap();

        assert_eq!(scan(dir.path(), Traversal::Flat).unwrap().count(), 0);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let result = scan(Path::new("/path/that/does/not/exist"), Traversal::Flat);

        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[test]
    fn test_scan_file_as_root() {
        let dir = tempdir().unwrap();
        let file = create_test_file(dir.path(), "1001.png");

        let result = scan(&file, Traversal::Recursive);

        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }
}
