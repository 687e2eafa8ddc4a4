use bitvec::prelude::*;
use std::fmt;

/// Fixed-size mask tagging the regions of one stage as active or frozen
///
/// Indices are positions in the stage's region list. A set bit marks a
/// region admitted to the next stage; a clear bit marks it frozen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionMask {
    bits: BitVec,
}

impl RegionMask {
    /// Build a mask from per-region gate decisions
    pub fn from_decisions<I>(decisions: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        Self {
            bits: decisions.into_iter().collect(),
        }
    }

    /// Test whether a region is active; out-of-range indices are frozen
    pub fn is_active(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Number of regions covered by the mask
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when the mask covers no regions
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of active regions
    pub fn active_count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Indices of all active regions in ascending order
    pub fn active_indices(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for RegionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RegionMask({} active / {} regions)",
            self.active_count(),
            self.len()
        )
    }
}
