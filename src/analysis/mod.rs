//! Block measurement and comparison-type handling

/// Per-block statistics and feature extraction
pub mod features;
/// Composite comparison types and their enumeration
pub mod types;
/// Color variance scoring
pub mod variance;
