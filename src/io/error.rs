//! Error types for index building and mosaic assembly

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Tile corpus directory could not be listed
    CorpusRead {
        /// Corpus directory
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A corpus tile could not be decoded during an index build
    TileDecode {
        /// Path to the offending tile
        path: PathBuf,
        /// Underlying decode error
        source: image::ImageError,
    },

    /// The corpus contained no usable tile images
    EmptyCorpus {
        /// Corpus directory
        path: PathBuf,
    },

    /// Cache artifact exists but could not be used
    ///
    /// Never fatal: the builder logs it and rescans the corpus.
    CacheRead {
        /// Cache artifact path
        path: PathBuf,
        /// Why the artifact was rejected
        reason: String,
    },

    /// Freshly built index could not be persisted
    ///
    /// Never fatal: the in-memory index stays valid for the current run.
    CacheWrite {
        /// Cache artifact path
        path: PathBuf,
        /// Why the write failed
        reason: String,
    },

    /// Every nearest candidate for a cell was excluded by its neighbours
    NoMatch {
        /// Grid cell (`block_x`, `block_y`)
        position: (usize, usize),
        /// Number of distinct excluded filenames
        excluded: usize,
        /// Number of candidates returned by the index
        candidates: usize,
    },

    /// Chosen tile image could not be loaded for compositing
    TileComposite {
        /// Tile filename chosen for the cell
        filename: String,
        /// Location the tile was read from
        path: PathBuf,
        /// Underlying image error
        source: image::ImageError,
    },

    /// Sampling region falls outside the image
    RegionOutOfBounds {
        /// Region as (x, y, width, height)
        region: (u32, u32, u32, u32),
        /// Image dimensions (width, height)
        image_dimensions: (u32, u32),
    },

    /// A placement grid cell was written twice or lies outside the grid
    CellOccupied {
        /// Grid cell (`block_x`, `block_y`)
        position: (usize, usize),
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Worker pool could not be created
    ThreadPool {
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::CorpusRead { path, source } => {
                write!(
                    f,
                    "Failed to read tile corpus '{}': {source}",
                    path.display()
                )
            }
            Self::TileDecode { path, source } => {
                write!(f, "Failed to decode tile '{}': {source}", path.display())
            }
            Self::EmptyCorpus { path } => {
                write!(
                    f,
                    "Tile corpus '{}' contains no usable images",
                    path.display()
                )
            }
            Self::CacheRead { path, reason } => {
                write!(f, "Unusable cache '{}': {reason}", path.display())
            }
            Self::CacheWrite { path, reason } => {
                write!(f, "Failed to write cache '{}': {reason}", path.display())
            }
            Self::NoMatch {
                position,
                excluded,
                candidates,
            } => {
                write!(
                    f,
                    "No eligible tile for cell ({}, {}): all {candidates} candidates excluded ({excluded} neighbours)",
                    position.0, position.1
                )
            }
            Self::TileComposite {
                filename,
                path,
                source,
            } => {
                write!(
                    f,
                    "Failed to composite tile '{filename}' from '{}': {source}",
                    path.display()
                )
            }
            Self::RegionOutOfBounds {
                region,
                image_dimensions,
            } => {
                write!(
                    f,
                    "Region {}x{} at ({}, {}) exceeds image {}x{}",
                    region.2, region.3, region.0, region.1, image_dimensions.0, image_dimensions.1
                )
            }
            Self::CellOccupied { position } => {
                write!(
                    f,
                    "Grid cell ({}, {}) is already placed or out of range",
                    position.0, position.1
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::ThreadPool { reason } => {
                write!(f, "Failed to start worker pool: {reason}")
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. }
            | Self::ImageExport { source, .. }
            | Self::TileDecode { source, .. }
            | Self::TileComposite { source, .. } => Some(source),
            Self::CorpusRead { source, .. } | Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl MosaicError {
    /// Whether the run can continue after this error
    ///
    /// Only cache problems are recoverable; everything else aborts the run.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::CacheRead { .. } | Self::CacheWrite { .. })
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
