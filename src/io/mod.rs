//! Input/output, configuration and error handling

/// Command-line interface and output naming
pub mod cli;
/// Named constants and defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Image loading and saving
pub mod image;
/// Progress display over variants
pub mod progress;
