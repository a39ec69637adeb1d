//! Defaults and the run configuration passed to every component

use crate::io::error::{Result, invalid_parameter};
use std::path::PathBuf;

/// Output resolution of one tile in pixels
pub const DEFAULT_TILE_SIZE: u32 = 40;

/// Target image pixels sampled per mosaic cell
pub const DEFAULT_BLOCK_SIZE: u32 = 10;

/// Grid window in which a placed tile may not repeat
pub const DEFAULT_EXCLUSION_RADIUS: usize = 2;

/// Cache artifact written next to the working directory
pub const DEFAULT_CACHE_FILE: &str = "tile_index.bin";

/// Output image written when no path is configured
pub const DEFAULT_OUTPUT_FILE: &str = "output.png";

/// Tile extensions accepted from the corpus (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Corpus tiles processed between progress log lines
pub const PROGRESS_LOG_INTERVAL: usize = 100;

/// Bumped whenever the cache artifact layout changes
pub const CACHE_FORMAT_VERSION: u32 = 1;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = 10_000;

/// How a cache artifact is checked before it is trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheValidation {
    /// Any artifact that deserializes is used; the corpus is not touched
    #[default]
    Trust,
    /// The corpus listing is fingerprinted and must match the artifact
    Fingerprint,
}

/// What to do with a corpus tile that fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorpusPolicy {
    /// Abort the whole build
    #[default]
    FailFast,
    /// Log the tile and leave it out of the index
    SkipUnreadable,
}

/// Tile corpus and index cache settings
#[derive(Debug, Clone)]
pub struct CorpusSettings {
    /// Directory holding the original tile images
    pub source_dir: PathBuf,
    /// Directory holding resized tiles used for compositing
    pub converted_dir: PathBuf,
    /// Cache artifact location
    pub cache_path: PathBuf,
    /// Edge length tiles are resized to
    pub tile_size: u32,
    /// Whether resized tiles are written to `converted_dir` during a build
    pub resize_and_persist: bool,
    /// Cache trust policy
    pub cache_validation: CacheValidation,
    /// Unreadable tile policy
    pub policy: CorpusPolicy,
}

/// Parameters of one mosaic assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblySettings {
    /// Target pixels per grid cell edge
    pub block_size: u32,
    /// Output pixels per grid cell edge
    pub tile_size: u32,
    /// Grid window in which a filename may not repeat
    pub exclusion_radius: usize,
    /// Optional (width, height) the target is resized to before slicing
    pub target_dimensions: Option<(u32, u32)>,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
            exclusion_radius: DEFAULT_EXCLUSION_RADIUS,
            target_dimensions: None,
        }
    }
}

impl AssemblySettings {
    /// Check the numeric parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a size is zero or the target dimensions
    /// are smaller than one block
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(invalid_parameter(
                "block_size",
                &self.block_size,
                &"must be positive",
            ));
        }
        if self.tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &self.tile_size,
                &"must be positive",
            ));
        }
        if let Some((width, height)) = self.target_dimensions {
            if width < self.block_size || height < self.block_size {
                return Err(invalid_parameter(
                    "target_dimensions",
                    &format!("{width}x{height}"),
                    &format!("must be at least one block ({})", self.block_size),
                ));
            }
        }
        Ok(())
    }
}

/// Complete run configuration, built once at startup
#[derive(Debug, Clone)]
pub struct MosaicConfig {
    /// Image to be rendered as a mosaic
    pub target_path: PathBuf,
    /// Where the finished mosaic is written
    pub output_path: PathBuf,
    /// Corpus and cache settings
    pub corpus: CorpusSettings,
    /// Assembly parameters
    pub assembly: AssemblySettings,
    /// Stop after the index is ready
    pub index_only: bool,
    /// Worker pool size, `None` for the rayon default
    pub threads: Option<usize>,
}

impl MosaicConfig {
    /// Validate every parameter of the run
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for the first invalid value found
    pub fn validate(&self) -> Result<()> {
        self.assembly.validate()?;
        if self.corpus.tile_size != self.assembly.tile_size {
            return Err(invalid_parameter(
                "tile_size",
                &self.corpus.tile_size,
                &format!(
                    "corpus and assembly tile sizes differ ({})",
                    self.assembly.tile_size
                ),
            ));
        }
        if self.threads == Some(0) {
            return Err(invalid_parameter("threads", &0, &"must be positive"));
        }
        Ok(())
    }
}
