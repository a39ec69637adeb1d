//! End-to-end run: index preparation followed by mosaic assembly
//!
//! The run moves through `Idle -> IndexReady -> Assembling -> Done`. Any
//! fatal error moves it to `Aborted` and nothing is written to the output
//! path.

use crate::algorithm::assembler::{ConvertedTiles, MosaicAssembler};
use crate::algorithm::builder::{IndexSource, TileIndexBuilder};
use crate::io::configuration::MosaicConfig;
use crate::io::error::{MosaicError, Result};
use crate::io::image::{load_image, save_image};
use crate::io::progress::ProgressManager;
use image::DynamicImage;
use std::path::PathBuf;
use tracing::{error, info};

/// Process-level state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing started yet
    Idle,
    /// Index built or restored
    IndexReady,
    /// Placement loop in progress
    Assembling,
    /// Finished successfully
    Done,
    /// Stopped by a fatal error; terminal
    Aborted,
}

/// Summary of a written mosaic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicSummary {
    /// Where the mosaic was saved
    pub output_path: PathBuf,
    /// Grid size (columns, rows)
    pub grid_dimensions: (usize, usize),
    /// Distinct tiles placed
    pub distinct_tiles: usize,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Whether the index came from the cache or a corpus scan
    pub index_source: IndexSource,
    /// Tiles in the index
    pub tiles_indexed: usize,
    /// Tiles skipped as unreadable
    pub tiles_skipped: usize,
    /// The written mosaic, absent in index-only runs
    pub mosaic: Option<MosaicSummary>,
}

/// Runs index preparation and assembly for one configuration
pub struct MosaicPipeline {
    config: MosaicConfig,
    progress: ProgressManager,
    state: RunState,
}

impl MosaicPipeline {
    /// Create an idle pipeline
    pub const fn new(config: MosaicConfig, progress: ProgressManager) -> Self {
        Self {
            config,
            progress,
            state: RunState::Idle,
        }
    }

    /// Current state
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Execute the run, on a bounded pool when a thread count is configured
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid or the worker pool cannot start
    /// - The run was already finished or aborted
    /// - Index building or assembly fails fatally
    pub fn run(&mut self) -> Result<RunReport> {
        if self.state != RunState::Idle {
            return Err(crate::io::error::invalid_parameter(
                "state",
                &format!("{:?}", self.state),
                &"pipeline can only run once",
            ));
        }

        let outcome = match self.config.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| MosaicError::ThreadPool {
                    reason: e.to_string(),
                })
                .and_then(|pool| pool.install(|| self.execute())),
            None => self.execute(),
        };

        self.progress.clear();
        if let Err(error) = &outcome {
            error!(%error, "run aborted");
            self.state = RunState::Aborted;
        }
        outcome
    }

    fn execute(&mut self) -> Result<RunReport> {
        self.config.validate()?;

        let built = TileIndexBuilder::new(&self.config.corpus, &self.progress).load_or_build()?;
        self.state = RunState::IndexReady;

        let mut report = RunReport {
            index_source: built.source,
            tiles_indexed: built.index.len(),
            tiles_skipped: built.skipped.len(),
            mosaic: None,
        };

        if self.config.index_only {
            info!(tiles = report.tiles_indexed, "index ready, assembly skipped");
            self.state = RunState::Done;
            return Ok(report);
        }

        let target = load_image(&self.config.target_path)?;
        self.state = RunState::Assembling;

        let tiles = ConvertedTiles::new(self.config.corpus.converted_dir.clone());
        let assembler = MosaicAssembler::new(&built.index, &tiles, self.config.assembly);
        let mosaic = assembler.assemble(&target, &self.progress)?;

        let output_path = self.config.output_path.clone();
        save_image(&DynamicImage::ImageRgba8(mosaic.canvas), &output_path)?;

        let summary = MosaicSummary {
            output_path,
            grid_dimensions: (mosaic.grid.width(), mosaic.grid.height()),
            distinct_tiles: mosaic.grid.distinct_tiles(),
        };
        info!(
            output = %summary.output_path.display(),
            columns = summary.grid_dimensions.0,
            rows = summary.grid_dimensions.1,
            distinct_tiles = summary.distinct_tiles,
            "mosaic written"
        );

        report.mosaic = Some(summary);
        self.state = RunState::Done;
        Ok(report)
    }
}
