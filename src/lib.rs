//! Photo mosaic generation by mean-color tile matching
//!
//! The system samples the mean color of every tile in a corpus into a k-d
//! tree, then walks the target image block by block, choosing the nearest
//! tile that was not already placed nearby.

#![forbid(unsafe_code)]

/// Index building, tile selection, assembly and the run pipeline
pub mod algorithm;
/// Color sampling over image regions
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Nearest-neighbour index and placement grid
pub mod spatial;

pub use io::error::{MosaicError, Result};
