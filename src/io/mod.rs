/// Persisted tile color cache
pub mod cache;
/// Command-line interface
pub mod cli;
/// Defaults and run configuration
pub mod configuration;
/// Tile corpus enumeration and fingerprinting
pub mod corpus;
/// Error types
pub mod error;
/// Image decode, resize, composite and export
pub mod image;
/// Logging setup
pub mod logging;
/// Progress display
pub mod progress;
