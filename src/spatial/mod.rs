//! Spatial layout of images into blocks
//!
//! This module contains:
//! - Rectangular block views over image pixels
//! - Uniform and non-uniform partitioning into offset tables

/// Rectangular block views
pub mod block;
/// Offset tables and the seeded partitioner
pub mod partition;

pub use block::Block;
pub use partition::OffsetTable;
