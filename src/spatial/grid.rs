//! Placement grid recording the tile chosen for each mosaic cell
//!
//! Cells are indexed `[block_x, block_y]` and written once each, in
//! column-major scan order. The exclusion window only ever sees cells that
//! come earlier in that order, since later cells are still unset.

use crate::analysis::color::ColorVector;
use crate::io::error::{MosaicError, Result};
use ndarray::Array2;
use std::collections::HashSet;
use std::ops::Range;

/// Tile placed into one grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Chosen tile filename
    pub filename: String,
    /// Mean color of the chosen tile
    pub color: ColorVector,
}

/// Grid of placed tiles, one cell per target block
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    cells: Array2<Option<Placement>>,
}

impl PlacementGrid {
    /// Create a grid with every cell unset
    pub fn new(grid_width: usize, grid_height: usize) -> Self {
        Self {
            cells: Array2::from_elem((grid_width, grid_height), None),
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cells.dim().0
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.cells.dim().1
    }

    /// Placement at a cell, `None` if unset or outside the grid
    pub fn get(&self, block_x: usize, block_y: usize) -> Option<&Placement> {
        self.cells.get((block_x, block_y)).and_then(Option::as_ref)
    }

    /// Record the tile chosen for a cell
    ///
    /// # Errors
    ///
    /// Returns `CellOccupied` if the cell is outside the grid or already set
    pub fn place(&mut self, block_x: usize, block_y: usize, placement: Placement) -> Result<()> {
        match self.cells.get_mut((block_x, block_y)) {
            Some(cell) if cell.is_none() => {
                *cell = Some(placement);
                Ok(())
            }
            _ => Err(MosaicError::CellOccupied {
                position: (block_x, block_y),
            }),
        }
    }

    /// Filenames already placed inside the exclusion window of a cell
    ///
    /// The cell itself never contributes.
    pub fn exclusion_set(&self, block_x: usize, block_y: usize, radius: usize) -> HashSet<&str> {
        let (columns, rows) = exclusion_window(
            [block_x, block_y],
            radius,
            [self.width(), self.height()],
        );

        let mut excluded = HashSet::new();
        for x in columns {
            for y in rows.clone() {
                if (x, y) == (block_x, block_y) {
                    continue;
                }
                if let Some(placement) = self.get(x, y) {
                    excluded.insert(placement.filename.as_str());
                }
            }
        }
        excluded
    }

    /// Number of distinct filenames placed so far
    pub fn distinct_tiles(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .map(|placement| placement.filename.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Placed cells in column-major order
    pub fn placements(&self) -> impl Iterator<Item = ((usize, usize), &Placement)> + '_ {
        self.cells
            .indexed_iter()
            .filter_map(|(position, cell)| cell.as_ref().map(|placement| (position, placement)))
    }
}

/// Column and row spans of the exclusion window around a cell
///
/// Covers `[x - radius, x + radius)` by `[y - radius, y + radius)`, clamped to
/// the grid. Under column-major visiting only earlier columns, and the rows
/// above the cell in its own column, can already be set when it is queried.
/// A radius of zero yields an empty window.
pub fn exclusion_window(
    position: [usize; 2],
    radius: usize,
    dimensions: [usize; 2],
) -> (Range<usize>, Range<usize>) {
    let [block_x, block_y] = position;
    let [width, height] = dimensions;
    let span = |center: usize, limit: usize| {
        let start = center.saturating_sub(radius);
        let end = center.saturating_add(radius).min(limit);
        start..end.max(start)
    };
    (span(block_x, width), span(block_y, height))
}
