//! Image analysis primitives
//!
//! Mean color sampling over regions and whole block grids.

/// Region and block color sampling
pub mod color;
