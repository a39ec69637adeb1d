//! Persisted tile color cache
//!
//! The artifact is a bincode-encoded header plus the ordered list of tile
//! records. Colors are stored as floating point channels; record order is the
//! corpus order the index was built from.

use crate::analysis::color::ColorVector;
use crate::io::configuration::CACHE_FORMAT_VERSION;
use crate::io::error::{MosaicError, Result};
use crate::spatial::TileRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A tile record as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedTile {
    /// Mean red channel
    pub red: f64,
    /// Mean green channel
    pub green: f64,
    /// Mean blue channel
    pub blue: f64,
    /// Corpus filename
    pub filename: String,
}

impl From<&TileRecord> for CachedTile {
    fn from(record: &TileRecord) -> Self {
        let [red, green, blue] = record.color.to_f64();
        Self {
            red,
            green,
            blue,
            filename: record.filename.clone(),
        }
    }
}

/// Serialized form of a built tile index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheArtifact {
    /// Layout version, see `CACHE_FORMAT_VERSION`
    pub version: u32,
    /// Fingerprint of the corpus listing the records came from
    pub fingerprint: u64,
    /// Tile records in build order
    pub tiles: Vec<CachedTile>,
}

impl CacheArtifact {
    /// Capture records and the corpus fingerprint they were built from
    pub fn new(records: &[TileRecord], fingerprint: u64) -> Self {
        Self {
            version: CACHE_FORMAT_VERSION,
            fingerprint,
            tiles: records.iter().map(CachedTile::from).collect(),
        }
    }

    /// Decode the stored tiles back into index records
    ///
    /// # Errors
    ///
    /// Returns `CacheRead` if a stored color is not a valid channel value
    pub fn to_records(&self, path: &Path) -> Result<Vec<TileRecord>> {
        self.tiles
            .iter()
            .map(|tile| {
                ColorVector::from_f64(tile.red, tile.green, tile.blue)
                    .map(|color| TileRecord::new(color, tile.filename.clone()))
                    .ok_or_else(|| MosaicError::CacheRead {
                        path: path.to_path_buf(),
                        reason: format!("invalid color stored for '{}'", tile.filename),
                    })
            })
            .collect()
    }
}

/// Read a cache artifact
///
/// # Errors
///
/// Returns `CacheRead` if the file cannot be read, does not deserialize, or
/// was written with a different format version
pub fn load_cache(path: &Path) -> Result<CacheArtifact> {
    let cache_error = |reason: String| MosaicError::CacheRead {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = std::fs::read(path).map_err(|e| cache_error(e.to_string()))?;
    let artifact: CacheArtifact =
        bincode::deserialize(&bytes).map_err(|e| cache_error(e.to_string()))?;

    if artifact.version != CACHE_FORMAT_VERSION {
        return Err(cache_error(format!(
            "format version {} (expected {CACHE_FORMAT_VERSION})",
            artifact.version
        )));
    }
    Ok(artifact)
}

/// Write a cache artifact, replacing any previous one
///
/// The artifact is staged in a temporary sibling and renamed into place.
///
/// # Errors
///
/// Returns `CacheWrite` if serialization or any filesystem step fails
pub fn save_cache(path: &Path, artifact: &CacheArtifact) -> Result<()> {
    let cache_error = |reason: String| MosaicError::CacheWrite {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = bincode::serialize(artifact).map_err(|e| cache_error(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| cache_error(e.to_string()))?;
    }

    let staging = path.with_extension("tmp");
    std::fs::write(&staging, bytes).map_err(|e| cache_error(e.to_string()))?;
    std::fs::rename(&staging, path).map_err(|e| cache_error(e.to_string()))?;
    Ok(())
}
