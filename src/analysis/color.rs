//! Mean color sampling over rectangular image regions
//!
//! Every color in the system is a truncated per-channel mean, so all
//! distances stay exact integers.

use crate::io::error::{MosaicError, Result};
use image::RgbaImage;
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Mean RGB color of a tile or block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColorVector {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
}

impl ColorVector {
    /// Create a color from its channels
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Channels as an array indexed by axis (0 = red, 1 = green, 2 = blue)
    pub const fn channels(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    /// Squared Euclidean distance in RGB space
    pub const fn distance_squared(&self, other: &Self) -> u32 {
        let dr = self.red.abs_diff(other.red) as u32;
        let dg = self.green.abs_diff(other.green) as u32;
        let db = self.blue.abs_diff(other.blue) as u32;
        dr * dr + dg * dg + db * db
    }

    /// Build a color from floating point channels in `[0, 255]`
    ///
    /// Returns `None` for non-finite or out-of-range channels.
    pub fn from_f64(red: f64, green: f64, blue: f64) -> Option<Self> {
        let channel = |value: f64| {
            (value.is_finite() && (0.0..=255.0).contains(&value)).then(|| value.round() as u8)
        };
        Some(Self::new(channel(red)?, channel(green)?, channel(blue)?))
    }

    /// Channels widened to floating point
    pub fn to_f64(&self) -> [f64; 3] {
        [
            f64::from(self.red),
            f64::from(self.green),
            f64::from(self.blue),
        ]
    }
}

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Region {
    /// Create a region
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square region covering grid cell (`block_x`, `block_y`)
    pub const fn block(block_x: u32, block_y: u32, block_size: u32) -> Self {
        Self::new(
            block_x * block_size,
            block_y * block_size,
            block_size,
            block_size,
        )
    }

    /// Region covering a whole image
    pub const fn whole(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    const fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }
}

/// Mean color of one target block together with its grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicBlock {
    /// Mean color of the block
    pub color: ColorVector,
    /// Grid cell (`block_x`, `block_y`)
    pub position: (usize, usize),
}

/// Blocks of a color grid in column-major visiting order
pub fn mosaic_blocks(colors: &Array2<ColorVector>) -> impl Iterator<Item = MosaicBlock> + '_ {
    colors
        .indexed_iter()
        .map(|(position, &color)| MosaicBlock { color, position })
}

/// Arithmetic mean of each channel over a region, truncated
///
/// Alpha is ignored.
///
/// # Errors
///
/// Returns `RegionOutOfBounds` if the region is empty or extends past the image
pub fn mean_color(image: &RgbaImage, region: Region) -> Result<ColorVector> {
    let out_of_bounds = || MosaicError::RegionOutOfBounds {
        region: region.as_tuple(),
        image_dimensions: image.dimensions(),
    };

    let end_x = region.x.checked_add(region.width).ok_or_else(out_of_bounds)?;
    let end_y = region.y.checked_add(region.height).ok_or_else(out_of_bounds)?;
    if region.width == 0 || region.height == 0 || end_x > image.width() || end_y > image.height()
    {
        return Err(out_of_bounds());
    }

    let mut sums = [0u64; 3];
    for y in region.y..end_y {
        for x in region.x..end_x {
            let pixel = image.get_pixel(x, y);
            for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += u64::from(channel);
            }
        }
    }

    let count = u64::from(region.width) * u64::from(region.height);
    let [red, green, blue] = sums.map(|sum| (sum / count) as u8);
    Ok(ColorVector::new(red, green, blue))
}

/// Mean colors of every block of an image, indexed `[block_x, block_y]`
///
/// Blocks are sampled in parallel; the result does not depend on scheduling.
/// Pixels past the last whole block are ignored.
///
/// # Errors
///
/// Returns `InvalidParameter` if `block_size` is zero
pub fn block_colors(image: &RgbaImage, block_size: u32) -> Result<Array2<ColorVector>> {
    if block_size == 0 {
        return Err(crate::io::error::invalid_parameter(
            "block_size",
            &block_size,
            &"must be positive",
        ));
    }

    let grid_width = image.width() / block_size;
    let grid_height = image.height() / block_size;

    let colors = (0..grid_width)
        .into_par_iter()
        .flat_map_iter(|block_x| {
            (0..grid_height)
                .map(move |block_y| mean_color(image, Region::block(block_x, block_y, block_size)))
        })
        .collect::<Result<Vec<_>>>()?;

    Array2::from_shape_vec((grid_width as usize, grid_height as usize), colors).map_err(|e| {
        crate::io::error::invalid_parameter("block_size", &block_size, &e.to_string())
    })
}
