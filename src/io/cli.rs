//! Command-line interface for building the tile index and rendering a mosaic

use crate::algorithm::pipeline::{MosaicPipeline, RunReport};
use crate::io::configuration::{
    AssemblySettings, CacheValidation, CorpusPolicy, CorpusSettings, DEFAULT_BLOCK_SIZE,
    DEFAULT_CACHE_FILE, DEFAULT_EXCLUSION_RADIUS, DEFAULT_OUTPUT_FILE, DEFAULT_TILE_SIZE,
    MosaicConfig,
};
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "photomosaic")]
#[command(
    author,
    version,
    about = "Render an image as a mosaic of color-matched tiles"
)]
/// Command-line arguments for the mosaic generator
///
/// Every option can also be supplied through the environment variable shown
/// in `--help`.
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Image to render as a mosaic
    #[arg(short, long, env = "TARGET_IMAGE_PATH", value_name = "IMAGE")]
    pub target: PathBuf,

    /// Directory of original tile images
    #[arg(long, env = "TILE_IMAGES_SOURCE_DIR", value_name = "DIR")]
    pub tiles: PathBuf,

    /// Directory of resized tiles used for compositing
    #[arg(long, env = "TILE_IMAGES_CONVERTED_DIR", value_name = "DIR")]
    pub converted: PathBuf,

    /// Output image path
    #[arg(short, long, env = "COLLAGE_OUTPUT_PATH", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Tile color cache path
    #[arg(long, env = "TILE_INDEX_CACHE", default_value = DEFAULT_CACHE_FILE)]
    pub cache: PathBuf,

    /// Output edge length of each tile in pixels
    #[arg(long, env = "IMAGE_TILE_SIZE", default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Target pixels sampled per mosaic cell
    #[arg(short, long, env = "COLLAGE_IMAGE_PIXEL_BLOCK", default_value_t = DEFAULT_BLOCK_SIZE)]
    pub block_size: u32,

    /// Grid distance within which a tile is not repeated
    #[arg(short = 'r', long, env = "SAME_TILE_DISTANCE", default_value_t = DEFAULT_EXCLUSION_RADIUS)]
    pub exclusion_radius: usize,

    /// Width the target is resized to before slicing, together with `--height`
    #[arg(short = 'W', long, env = "GENERATED_IMAGE_WIDTH", requires = "height")]
    pub width: Option<u32>,

    /// Height the target is resized to before slicing, together with `--width`
    #[arg(short = 'H', long, env = "GENERATED_IMAGE_HEIGHT", requires = "width")]
    pub height: Option<u32>,

    /// Save resized tiles into the converted directory while indexing
    #[arg(long, env = "RESIZE_AND_SAVE_BASE_IMAGES")]
    pub resize_and_save: bool,

    /// Only build or restore the index
    #[arg(long)]
    pub index_only: bool,

    /// Skip undecodable tiles instead of aborting the index build
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Reject the cache when the corpus listing has changed
    #[arg(long)]
    pub verify_cache: bool,

    /// Worker threads for tile and block sampling
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Suppress progress bars and informational logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Target dimensions, present only when both sides are given
    pub const fn target_dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }

    /// Build the run configuration from the parsed arguments
    pub fn to_config(&self) -> MosaicConfig {
        MosaicConfig {
            target_path: self.target.clone(),
            output_path: self.output.clone(),
            corpus: CorpusSettings {
                source_dir: self.tiles.clone(),
                converted_dir: self.converted.clone(),
                cache_path: self.cache.clone(),
                tile_size: self.tile_size,
                resize_and_persist: self.resize_and_save,
                cache_validation: if self.verify_cache {
                    CacheValidation::Fingerprint
                } else {
                    CacheValidation::Trust
                },
                policy: if self.skip_unreadable {
                    CorpusPolicy::SkipUnreadable
                } else {
                    CorpusPolicy::FailFast
                },
            },
            assembly: AssemblySettings {
                block_size: self.block_size,
                tile_size: self.tile_size,
                exclusion_radius: self.exclusion_radius,
                target_dimensions: self.target_dimensions(),
            },
            index_only: self.index_only,
            threads: self.threads,
        }
    }

    /// Run the pipeline described by these arguments
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the run
    pub fn run(&self) -> Result<RunReport> {
        let progress = if self.should_show_progress() {
            ProgressManager::new()
        } else {
            ProgressManager::hidden()
        };

        MosaicPipeline::new(self.to_config(), progress).run()
    }
}
