//! Color variance scoring for the detail gate

use std::fmt;

use crate::io::configuration::MAX_THRESHOLD;

/// Color spread of a block on a 0-10 scale
///
/// The score is the share of distinct colors among the block's pixels,
/// scaled to ten and truncated: a flat block scores 0, a block where every
/// pixel differs scores 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VarianceScore(u8);

impl VarianceScore {
    /// Score from a distinct-color count and a pixel count
    pub fn from_counts(unique_colors: u64, pixel_count: u64) -> Self {
        if pixel_count == 0 {
            return Self(0);
        }
        let scaled = unique_colors.saturating_mul(u64::from(MAX_THRESHOLD)) / pixel_count;
        Self(scaled.min(u64::from(MAX_THRESHOLD)) as u8)
    }

    /// Raw score value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether the score admits refinement at `threshold` (inclusive)
    pub const fn meets(self, threshold: u8) -> bool {
        self.0 >= threshold
    }
}

impl fmt::Display for VarianceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
