//! Tile index construction from a corpus, with a persisted color cache
//!
//! A readable cache artifact short-circuits the corpus scan entirely. A fresh
//! scan decodes, resizes and samples every tile on the rayon pool, then
//! writes the cache for the next run.

use crate::analysis::color::{Region, mean_color};
use crate::io::cache::{CacheArtifact, load_cache, save_cache};
use crate::io::configuration::{
    CacheValidation, CorpusPolicy, CorpusSettings, PROGRESS_LOG_INTERVAL,
};
use crate::io::corpus::{CorpusEntry, fingerprint, scan_corpus};
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::image::{fill, save_image};
use crate::io::progress::ProgressManager;
use crate::spatial::{SpatialIndex, TileRecord};
use image::DynamicImage;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Where a ready index came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    /// Decoded from the cache artifact
    Cache,
    /// Built by scanning the corpus
    Corpus,
}

/// A ready index and its provenance
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    /// The queryable index
    pub index: SpatialIndex,
    /// Whether the cache was used
    pub source: IndexSource,
    /// Tiles dropped under `CorpusPolicy::SkipUnreadable`
    pub skipped: Vec<String>,
}

/// Builds or restores the tile index for one corpus
pub struct TileIndexBuilder<'a> {
    settings: &'a CorpusSettings,
    progress: &'a ProgressManager,
}

impl<'a> TileIndexBuilder<'a> {
    /// Create a builder for the given corpus settings
    pub const fn new(settings: &'a CorpusSettings, progress: &'a ProgressManager) -> Self {
        Self { settings, progress }
    }

    /// Restore the index from the cache, or build it from the corpus
    ///
    /// Unreadable or stale caches are logged and fall through to a rebuild.
    /// A corpus that cannot be listed while fingerprinting the cache is
    /// returned as is. A failed cache write after a rebuild is logged and the
    /// built index is still returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tile size is zero
    /// - The corpus directory cannot be listed
    /// - A tile fails to decode under `CorpusPolicy::FailFast`
    /// - No usable tile remains
    pub fn load_or_build(&self) -> Result<BuiltIndex> {
        if self.settings.tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &self.settings.tile_size,
                &"must be positive",
            ));
        }

        match self.try_cache() {
            Ok(Some(index)) => {
                info!(
                    tiles = index.len(),
                    path = %self.settings.cache_path.display(),
                    "tile index restored from cache"
                );
                return Ok(BuiltIndex {
                    index,
                    source: IndexSource::Cache,
                    skipped: Vec::new(),
                });
            }
            Ok(None) => {}
            Err(error) if error.is_recoverable() => warn!(%error, "ignoring tile cache"),
            Err(error) => return Err(error),
        }

        self.build_from_corpus()
    }

    // Ok(None) means there is no cache to try
    fn try_cache(&self) -> Result<Option<SpatialIndex>> {
        let path = &self.settings.cache_path;
        if !path.exists() {
            debug!(path = %path.display(), "no tile cache present");
            return Ok(None);
        }

        let artifact = load_cache(path)?;

        if self.settings.cache_validation == CacheValidation::Fingerprint {
            let current = fingerprint(&scan_corpus(&self.settings.source_dir)?);
            if current != artifact.fingerprint {
                return Err(MosaicError::CacheRead {
                    path: path.clone(),
                    reason: format!(
                        "corpus fingerprint {current:016x} does not match cached {:016x}",
                        artifact.fingerprint
                    ),
                });
            }
        }

        Ok(Some(SpatialIndex::build(artifact.to_records(path)?)))
    }

    fn build_from_corpus(&self) -> Result<BuiltIndex> {
        let source_dir = &self.settings.source_dir;
        let entries = scan_corpus(source_dir)?;
        if entries.is_empty() {
            return Err(MosaicError::EmptyCorpus {
                path: source_dir.clone(),
            });
        }
        info!(
            tiles = entries.len(),
            corpus = %source_dir.display(),
            "scanning tile corpus"
        );

        let bar = self.progress.start_phase("tiles", entries.len());
        let processed = AtomicUsize::new(0);

        let outcomes: Vec<Result<TileRecord>> = entries
            .par_iter()
            .map(|entry| {
                let outcome = self.process_tile(entry);
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % PROGRESS_LOG_INTERVAL == 0 {
                    debug!(done, total = entries.len(), "tiles processed");
                }
                bar.inc(1);
                outcome
            })
            .collect();

        let mut records = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for (entry, outcome) in entries.iter().zip(outcomes) {
            match outcome {
                Ok(record) => records.push(record),
                Err(error) if self.settings.policy == CorpusPolicy::SkipUnreadable => {
                    warn!(%error, "skipping unreadable tile");
                    skipped.push(entry.filename.clone());
                }
                Err(error) => {
                    bar.abandon();
                    return Err(error);
                }
            }
        }
        ProgressManager::finish_phase(&bar, format!("{} tiles indexed", records.len()));

        if records.is_empty() {
            return Err(MosaicError::EmptyCorpus {
                path: source_dir.clone(),
            });
        }

        let artifact = CacheArtifact::new(&records, fingerprint(&entries));
        match save_cache(&self.settings.cache_path, &artifact) {
            Ok(()) => info!(
                path = %self.settings.cache_path.display(),
                "tile cache written"
            ),
            Err(error) => warn!(%error, "tile cache not persisted"),
        }

        Ok(BuiltIndex {
            index: SpatialIndex::build(records),
            source: IndexSource::Corpus,
            skipped,
        })
    }

    fn process_tile(&self, entry: &CorpusEntry) -> Result<TileRecord> {
        let source = image::open(&entry.path).map_err(|e| MosaicError::TileDecode {
            path: entry.path.clone(),
            source: e,
        })?;

        let size = self.settings.tile_size;
        let tile = fill(&source, size, size).to_rgba8();

        if self.settings.resize_and_persist {
            let destination = self.settings.converted_dir.join(&entry.filename);
            if let Err(error) = save_image(&DynamicImage::ImageRgba8(tile.clone()), &destination)
            {
                warn!(%error, "resized tile not saved");
            }
        }

        let color = mean_color(&tile, Region::whole(size, size))?;
        Ok(TileRecord::new(color, entry.filename.clone()))
    }
}
