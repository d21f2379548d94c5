use log::{debug, info, warn};
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Extract every entry of a ZIP archive into a fresh temporary directory.
///
/// The directory and everything in it are removed when the returned guard is
/// dropped. Entries whose names would land outside the destination are
/// skipped. Any failure to read the archive is reported as
/// [`Error::SourceUnavailable`] and leaves nothing behind.
pub fn extract_to_temp(archive_path: &Path) -> Result<TempDir> {
    extract_to_temp_in(archive_path, &std::env::temp_dir())
}

/// Like [`extract_to_temp`], with the temporary directory created below `parent`
pub fn extract_to_temp_in(archive_path: &Path, parent: &Path) -> Result<TempDir> {
    let dest = tempfile::Builder::new()
        .prefix("userpicbatch")
        .tempdir_in(parent)
        .map_err(|e| Error::source_unavailable(archive_path, e))?;

    extract_into(archive_path, dest.path())
        .map_err(|e| Error::source_unavailable(archive_path, e))?;

    Ok(dest)
}

/// Extract a ZIP archive into an existing directory
pub fn extract_into(archive_path: &Path, dest_dir: &Path) -> Result<usize> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut extracted = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let outpath = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                warn!("Skipping archive entry with unsafe path: {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)?;
        std::io::copy(&mut entry, &mut outfile)?;
        debug!("Extracted {}", outpath.display());
        extracted += 1;
    }

    info!(
        "Extracted {} file(s) from {} into {}",
        extracted,
        archive_path.display(),
        dest_dir.display()
    );
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_nested_entries() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("photos.zip");
        write_zip(
            &zip_path,
            &[("1001.png", b"one"), ("class-a/1002.jpg", b"two")],
        );

        let extracted = extract_to_temp(&zip_path).unwrap();

        assert!(extracted.path().join("1001.png").is_file());
        assert!(extracted.path().join("class-a/1002.jpg").is_file());
    }

    #[test]
    fn test_temp_dir_removed_on_drop() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("photos.zip");
        write_zip(&zip_path, &[("1001.png", b"one")]);

        let extracted = extract_to_temp(&zip_path).unwrap();
        let root = extracted.path().to_path_buf();
        drop(extracted);

        assert!(!root.exists());
    }

    #[test]
    fn test_unsafe_entries_are_skipped() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("photos.zip");
        write_zip(&zip_path, &[("../escape.png", b"x"), ("1001.png", b"one")]);

        let dest = tempdir().unwrap();
        let count = extract_into(&zip_path, dest.path()).unwrap();

        assert_eq!(count, 1);
        assert!(!dest.path().parent().unwrap().join("escape.png").exists());
    }

    #[test]
    fn test_corrupt_archive_is_source_unavailable() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("photos.zip");
        fs::write(&zip_path, b"this is not a zip file").unwrap();

        let result = extract_to_temp(&zip_path);

        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }

    #[test]
    fn test_missing_archive_is_source_unavailable() {
        let result = extract_to_temp(Path::new("/path/that/does/not/exist.zip"));
        assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    }
}
