//! Spatial data structures
//!
//! This module contains:
//! - The k-d tree over tile mean colors
//! - The placement grid and its exclusion window

/// Placement grid and exclusion window
pub mod grid;
/// Nearest-neighbour index over tile colors
pub mod index;

pub use grid::{Placement, PlacementGrid};
pub use index::{Neighbor, SpatialIndex, TileRecord};
