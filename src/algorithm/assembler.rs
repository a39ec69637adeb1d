//! Mosaic assembly: block sampling, constrained matching and compositing
//!
//! Block colors are independent of placement and are sampled up front in
//! parallel. Placement itself is strictly sequential in column-major order,
//! because each cell's exclusion set depends on every earlier decision.

use crate::algorithm::selection::select_tile;
use crate::analysis::color::{MosaicBlock, block_colors, mosaic_blocks};
use crate::io::configuration::{AssemblySettings, MAX_GRID_DIMENSION};
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::image::{blank_canvas, composite, fit_exact};
use crate::io::progress::ProgressManager;
use crate::spatial::{Placement, PlacementGrid, SpatialIndex};
use image::{DynamicImage, RgbaImage};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use tracing::{info, trace};

/// Supplies the resized tile image for a chosen filename
pub trait TileSource {
    /// Load the tile stored under `filename`
    ///
    /// # Errors
    ///
    /// Returns `TileComposite` if the tile is missing or unreadable
    fn load_tile(&self, filename: &str) -> Result<RgbaImage>;
}

/// Resized tiles stored as files in the converted-tiles directory
#[derive(Debug, Clone)]
pub struct ConvertedTiles {
    directory: PathBuf,
}

impl ConvertedTiles {
    /// Read tiles from `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl TileSource for ConvertedTiles {
    fn load_tile(&self, filename: &str) -> Result<RgbaImage> {
        let path = self.directory.join(filename);
        image::open(&path)
            .map(|tile| tile.to_rgba8())
            .map_err(|e| MosaicError::TileComposite {
                filename: filename.to_string(),
                path,
                source: e,
            })
    }
}

impl TileSource for HashMap<String, RgbaImage> {
    fn load_tile(&self, filename: &str) -> Result<RgbaImage> {
        self.get(filename)
            .cloned()
            .ok_or_else(|| MosaicError::TileComposite {
                filename: filename.to_string(),
                path: PathBuf::from(filename),
                source: image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "tile not in memory store",
                )),
            })
    }
}

/// A finished mosaic and the placement decisions behind it
#[derive(Debug, Clone)]
pub struct Mosaic {
    /// Composited output image
    pub canvas: RgbaImage,
    /// Tile chosen for every cell
    pub grid: PlacementGrid,
}

/// Drives one assembly over a prepared target image
pub struct MosaicAssembler<'a, S: TileSource> {
    index: &'a SpatialIndex,
    tiles: &'a S,
    settings: AssemblySettings,
}

impl<'a, S: TileSource> MosaicAssembler<'a, S> {
    /// Create an assembler over a ready index and tile store
    pub const fn new(index: &'a SpatialIndex, tiles: &'a S, settings: AssemblySettings) -> Self {
        Self {
            index,
            tiles,
            settings,
        }
    }

    /// Resize the target so both sides are whole multiples of the block size
    ///
    /// Uses the configured target dimensions, or the image's own, rounded
    /// down to the block size.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the block size is zero or either side
    /// rounds down to nothing
    pub fn prepare_target(&self, target: &DynamicImage) -> Result<RgbaImage> {
        let block_size = self.settings.block_size;
        if block_size == 0 {
            return Err(invalid_parameter(
                "block_size",
                &block_size,
                &"must be positive",
            ));
        }

        let (width, height) = self
            .settings
            .target_dimensions
            .unwrap_or((target.width(), target.height()));
        let aligned_width = (width / block_size) * block_size;
        let aligned_height = (height / block_size) * block_size;
        if aligned_width == 0 || aligned_height == 0 {
            return Err(invalid_parameter(
                "target_dimensions",
                &format!("{width}x{height}"),
                &format!("smaller than one block ({block_size})"),
            ));
        }

        Ok(fit_exact(target, aligned_width, aligned_height))
    }

    /// Prepare the target and assemble the mosaic
    ///
    /// # Errors
    ///
    /// See [`Self::prepare_target`] and [`Self::assemble_prepared`]
    pub fn assemble(&self, target: &DynamicImage, progress: &ProgressManager) -> Result<Mosaic> {
        let prepared = self.prepare_target(target)?;
        self.assemble_prepared(&prepared, progress)
    }

    /// Assemble a mosaic from a block-aligned target
    ///
    /// Trailing pixels that do not fill a whole block are ignored. The first
    /// failing cell aborts the assembly and no canvas is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The settings are invalid or the grid or canvas would be too large
    /// - A cell has no eligible tile (`NoMatch`)
    /// - A chosen tile cannot be loaded (`TileComposite`)
    pub fn assemble_prepared(
        &self,
        target: &RgbaImage,
        progress: &ProgressManager,
    ) -> Result<Mosaic> {
        self.settings.validate()?;
        let AssemblySettings {
            block_size,
            tile_size,
            exclusion_radius,
            ..
        } = self.settings;

        let colors = block_colors(target, block_size)?;
        let (grid_width, grid_height) = colors.dim();
        if grid_width == 0 || grid_height == 0 {
            return Err(invalid_parameter(
                "target",
                &format!("{}x{}", target.width(), target.height()),
                &format!("smaller than one block ({block_size})"),
            ));
        }
        if grid_width > MAX_GRID_DIMENSION || grid_height > MAX_GRID_DIMENSION {
            return Err(invalid_parameter(
                "target",
                &format!("{grid_width}x{grid_height} cells"),
                &format!("grid exceeds {MAX_GRID_DIMENSION} cells per side"),
            ));
        }

        let canvas_width = (grid_width as u32).checked_mul(tile_size);
        let canvas_height = (grid_height as u32).checked_mul(tile_size);
        let (Some(canvas_width), Some(canvas_height)) = (canvas_width, canvas_height) else {
            return Err(invalid_parameter(
                "tile_size",
                &tile_size,
                &"output canvas exceeds u32 pixels",
            ));
        };

        info!(
            grid_width,
            grid_height, canvas_width, canvas_height, "assembling mosaic"
        );

        let mut canvas = blank_canvas(canvas_width, canvas_height);
        let mut grid = PlacementGrid::new(grid_width, grid_height);
        let mut decoded: HashMap<String, RgbaImage> = HashMap::new();
        let bar = progress.start_phase("cells", grid_width * grid_height);

        for MosaicBlock { color, position } in mosaic_blocks(&colors) {
            let (block_x, block_y) = position;

            let excluded = grid.exclusion_set(block_x, block_y, exclusion_radius);
            let record = match select_tile(self.index, color, &excluded, position) {
                Ok(record) => record,
                Err(error) => {
                    bar.abandon();
                    return Err(error);
                }
            };
            trace!(
                block_x,
                block_y,
                excluded = excluded.len(),
                tile = %record.filename,
                "cell matched"
            );

            grid.place(
                block_x,
                block_y,
                Placement {
                    filename: record.filename.clone(),
                    color: record.color,
                },
            )?;

            let tile = match decoded.entry(record.filename.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let loaded = match self.tiles.load_tile(&record.filename) {
                        Ok(loaded) => loaded,
                        Err(error) => {
                            bar.abandon();
                            return Err(error);
                        }
                    };
                    entry.insert(Self::normalize_tile(loaded, tile_size))
                }
            };
            composite(
                &mut canvas,
                tile,
                block_x as u32 * tile_size,
                block_y as u32 * tile_size,
            );
            bar.inc(1);
        }

        ProgressManager::finish_phase(
            &bar,
            format!("{} distinct tiles", grid.distinct_tiles()),
        );
        Ok(Mosaic { canvas, grid })
    }

    // Converted tiles should already be square at the tile size
    fn normalize_tile(tile: RgbaImage, tile_size: u32) -> RgbaImage {
        if tile.dimensions() == (tile_size, tile_size) {
            tile
        } else {
            fit_exact(&DynamicImage::ImageRgba8(tile), tile_size, tile_size)
        }
    }
}
