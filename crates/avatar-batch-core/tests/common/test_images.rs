use image::{Rgb, RgbImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Create a small real picture; the format follows the extension
pub fn create_test_image(dir: &Path, file_name: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();

    let file_path = dir.join(file_name);
    let img = RgbImage::from_fn(48, 32, |x, y| Rgb([(x * 5) as u8, (y * 7) as u8, 128]));
    img.save(&file_path).unwrap();
    file_path
}

/// Create a file with dummy content that no decoder accepts
pub fn create_dummy_file(dir: &Path, file_name: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();

    let file_path = dir.join(file_name);
    let mut file = File::create(&file_path).unwrap();
    file.write_all(b"DUMMY IMAGE DATA").unwrap();
    file_path
}

/// The three-file layout used by most scenarios:
/// a user without picture, an unknown key, a user with a picture
pub fn create_scenario_images(dir: &Path) -> Vec<PathBuf> {
    vec![
        create_test_image(dir, "1001.png"),
        create_test_image(dir, "9999.jpg"),
        create_test_image(dir, "1002.gif"),
    ]
}

/// Pack files into a ZIP archive under the given entry names
pub fn create_zip(zip_path: &Path, entries: &[(&str, &Path)]) {
    let file = File::create(zip_path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, source) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(&fs::read(source).unwrap()).unwrap();
    }
    zip.finish().unwrap();
}
