//! Image loading and export for rebuild inputs and outputs

use image::RgbImage;
use std::path::Path;

use crate::io::error::{RebuildError, Result};

/// Load an image from disk and convert it to 8-bit RGB
///
/// # Errors
///
/// Returns [`RebuildError::ImageLoad`] if the file cannot be opened or decoded
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).map_err(|e| RebuildError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(image.to_rgb8())
}

/// Save an RGB image, creating the parent directory when missing
///
/// The encoder is chosen from the file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_rgb(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| RebuildError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    image.save(path).map_err(|e| RebuildError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}
