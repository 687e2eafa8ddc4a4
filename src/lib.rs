//! Image mosaic rebuilding from blocks of a fixed-size source image
//!
//! A destination image is partitioned into blocks, each block is matched to
//! the most similar tile of a 512x512 source by a chosen combination of
//! color features, and the matches are composited into a new image. An
//! optional detail pass subdivides blocks where the destination shows many
//! distinct colors.

#![forbid(unsafe_code)]

/// Matching, refinement, compositing and the rebuild engine
pub mod algorithm;
/// Block statistics, feature extraction and comparison types
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Color conversions and distance functions
pub mod math;
/// Block geometry and partitioning
pub mod spatial;

pub use io::error::{RebuildError, Result};
