use log::info;
use std::path::Path;

use crate::error::{Error, Result};
use crate::logging::log_file_error;

/// Largest picture file accepted before decoding
pub const MAX_FILE_SIZE: u64 = 50_000_000;

/// Check that a picture file exists, is not empty and is not oversized
pub fn validate_picture_file(path: &Path) -> Result<std::fs::Metadata> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            log_file_error(path, "metadata", &e);
            return Err(Error::Io(e));
        }
    };

    let file_size = metadata.len();

    if file_size == 0 {
        let e = std::io::Error::new(std::io::ErrorKind::InvalidData, "Zero-sized file");
        log_file_error(path, "check_size", &e);
        return Err(Error::Io(e));
    }

    if file_size > MAX_FILE_SIZE {
        return Err(Error::UnsupportedFormat(format!(
            "{} is {}MB, limit is {}MB",
            path.display(),
            file_size / 1_000_000,
            MAX_FILE_SIZE / 1_000_000
        )));
    }

    if file_size > 10_000_000 {
        info!(
            "Processing large picture ({}MB): '{}'",
            file_size / 1_000_000,
            path.display()
        );
    }

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file() {
        let result = validate_picture_file(Path::new("/path/that/does/not/exist.png"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_zero_sized_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1001.png");
        fs::write(&path, b"").unwrap();

        assert!(validate_picture_file(&path).is_err());
    }

    #[test]
    fn test_regular_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("1001.png");
        fs::write(&path, b"DUMMY IMAGE DATA").unwrap();

        assert_eq!(validate_picture_file(&path).unwrap().len(), 16);
    }
}
