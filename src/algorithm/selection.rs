//! Nearest-tile selection under the local uniqueness constraint

use crate::analysis::color::ColorVector;
use crate::io::error::{MosaicError, Result};
use crate::spatial::{SpatialIndex, TileRecord};
use std::collections::HashSet;

/// Closest tile whose filename is not excluded
///
/// Queries `excluded.len() + 1` neighbours and walks them nearest first. The
/// walk never looks past those candidates, so if they are all excluded the
/// cell has no match even when a farther tile would qualify.
///
/// # Errors
///
/// Returns `NoMatch` if every returned candidate is excluded
pub fn select_tile<'a>(
    index: &'a SpatialIndex,
    color: ColorVector,
    excluded: &HashSet<&str>,
    position: (usize, usize),
) -> Result<&'a TileRecord> {
    let candidates = index.nearest_k(color, excluded.len() + 1);
    let count = candidates.len();

    candidates
        .into_iter()
        .map(|neighbor| neighbor.record)
        .find(|record| !excluded.contains(record.filename.as_str()))
        .ok_or(MosaicError::NoMatch {
            position,
            excluded: excluded.len(),
            candidates: count,
        })
}
