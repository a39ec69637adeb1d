//! Image decode, resize, composite and export primitives

use crate::io::error::{MosaicError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;

/// Resampling filter used for every resize
pub const RESAMPLING_FILTER: FilterType = FilterType::Lanczos3;

/// Open and decode an image
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Scale to cover `width` x `height`, then crop the overflow around the center
pub fn fill(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    image.resize_to_fill(width, height, RESAMPLING_FILTER)
}

/// Fill a target image to exact dimensions, skipping the resample when the
/// image already has them
pub fn fit_exact(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    if image.width() == width && image.height() == height {
        image.to_rgba8()
    } else {
        fill(image, width, height).to_rgba8()
    }
}

/// Fully transparent canvas
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
}

/// Alpha-composite `tile` over `canvas` with its top-left corner at (x, y)
///
/// Pixels falling outside the canvas are clipped.
pub fn composite(canvas: &mut RgbaImage, tile: &RgbaImage, x: u32, y: u32) {
    imageops::overlay(canvas, tile, i64::from(x), i64::from(y));
}

/// Save an image, creating the parent directory if needed
///
/// JPEG output drops the alpha channel since the format cannot store it.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));

    let result = if is_jpeg {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)
    } else {
        image.save(path)
    };

    result.map_err(|e| MosaicError::ImageExport {
        path: path.to_path_buf(),
        source: e,
    })
}
