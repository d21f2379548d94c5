use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use log::debug;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::file_validation::validate_picture_file;
use super::IconProcessor;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::persistence::User;
use crate::types::RevisionToken;

/// Renders profile icons with the `image` crate.
///
/// Each configured size is written as `<icon_dir>/<user id>/f<n>.png`, where
/// `n` counts from 1 in configuration order.
#[derive(Debug, Clone)]
pub struct IconService {
    icon_dir: PathBuf,
    sizes: Vec<u32>,
}

impl IconService {
    pub fn new(icon_dir: impl Into<PathBuf>, sizes: Vec<u32>) -> Self {
        Self {
            icon_dir: icon_dir.into(),
            sizes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.icon_dir.clone(), config.icon_sizes.clone())
    }

    /// Directory holding the icons of one user
    pub fn user_dir(&self, user_id: i64) -> PathBuf {
        self.icon_dir.join(user_id.to_string())
    }
}

impl IconProcessor for IconService {
    fn process(&self, user: &User, path: &Path) -> Result<RevisionToken> {
        validate_picture_file(path)?;

        // Sniff the content; the extension alone is not trusted
        let img = image::io::Reader::open(path)?
            .with_guessed_format()?
            .decode()?;

        let square = crop_to_square(&img);
        if square.width() == 0 {
            return Err(Error::Image(format!("{} has no pixels", path.display())));
        }

        let out_dir = self.user_dir(user.id);
        fs::create_dir_all(&out_dir)?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(&user.id.to_le_bytes());

        for (index, &size) in self.sizes.iter().enumerate() {
            let rendition = square.resize_exact(size, size, FilterType::Lanczos3);

            let mut bytes = Vec::new();
            rendition.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
            hasher.update(&bytes);

            let out_path = out_dir.join(format!("f{}.png", index + 1));
            fs::write(&out_path, &bytes)?;
            debug!("Wrote {}x{} icon to {}", size, size, out_path.display());
        }

        let revision = revision_from_digest(hasher.finalize());
        debug!(
            "Rendered {} icon(s) for user {} from {} (revision {})",
            self.sizes.len(),
            user.id,
            path.display(),
            revision
        );

        Ok(revision)
    }
}

/// Crop the centred square of an image
fn crop_to_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let side = width.min(height);
    img.crop_imm((width - side) / 2, (height - side) / 2, side, side)
}

/// Fold a digest into a positive, non-zero revision
fn revision_from_digest(digest: blake3::Hash) -> RevisionToken {
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    let value = i64::from_le_bytes(head) & i64::MAX;
    RevisionToken(value.max(1))
}
