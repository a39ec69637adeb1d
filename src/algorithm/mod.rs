/// Mosaic assembly over a prepared target image
pub mod assembler;
/// Tile index construction and cache handling
pub mod builder;
/// End-to-end run state machine
pub mod pipeline;
/// Constrained nearest-tile selection
pub mod selection;
