//! Variance-gated detail refinement across coarse, medium and fine stages
//!
//! Each stage is a tagged region list: the regions produced at that stage
//! together with a [`RegionMask`] marking which of them passed the gate into
//! the next stage. Only active regions are subdivided; frozen regions keep
//! their coarser result. Gates depend on destination pixels alone, so one
//! plan serves every comparison variant of a run.

use image::RgbImage;
use log::debug;
use std::fmt;

use crate::algorithm::mask::RegionMask;
use crate::analysis::features::BlockStats;
use crate::analysis::variance::VarianceScore;
use crate::io::configuration::{MAX_THRESHOLD, MIN_THRESHOLD};
use crate::io::error::{RebuildError, Result};
use crate::spatial::block::Block;
use crate::spatial::partition::{OffsetTable, Partitioner};

/// Refinement stage, applied in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Whole image at the nominal block size
    Coarse,
    /// Half the nominal size inside admitted coarse regions
    Medium,
    /// Quarter the nominal size inside admitted medium regions
    Fine,
}

impl Stage {
    /// Stage following this one
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Coarse => Some(Self::Medium),
            Self::Medium => Some(Self::Fine),
            Self::Fine => None,
        }
    }

    /// Factor the nominal block size is divided by at this stage
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Coarse => 1,
            Self::Medium => 2,
            Self::Fine => 4,
        }
    }

    /// Block size used at this stage, never below one pixel
    pub const fn block_size(self, nominal: u32) -> u32 {
        let size = nominal / self.divisor();
        if size == 0 { 1 } else { size }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Coarse => "coarse",
            Self::Medium => "medium",
            Self::Fine => "fine",
        };
        write!(f, "{name}")
    }
}

/// Validated medium and small variance thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    medium: u8,
    small: u8,
}

impl Thresholds {
    /// Validate both thresholds against the 1-10 range
    ///
    /// # Errors
    ///
    /// Returns [`RebuildError::ThresholdOutOfRange`] naming the first
    /// threshold outside the range
    pub fn new(medium: u8, small: u8) -> Result<Self> {
        for (name, value) in [("medium", medium), ("small", small)] {
            if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value) {
                return Err(RebuildError::ThresholdOutOfRange { name, value });
            }
        }
        Ok(Self { medium, small })
    }

    /// Threshold gating the medium stage
    pub const fn medium(self) -> u8 {
        self.medium
    }

    /// Threshold gating the fine stage
    pub const fn small(self) -> u8 {
        self.small
    }

    /// Threshold a region produced at `stage` must meet to be refined further
    pub const fn gate_after(self, stage: Stage) -> Option<u8> {
        match stage {
            Stage::Coarse => Some(self.medium),
            Stage::Medium => Some(self.small),
            Stage::Fine => None,
        }
    }
}

/// Whether a region with `score` passes a gate; no gate admits nothing
pub const fn admits(score: VarianceScore, threshold: Option<u8>) -> bool {
    match threshold {
        Some(threshold) => score.meets(threshold),
        None => false,
    }
}

/// Destination region with the statistics measured for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Region geometry in destination coordinates
    pub block: Block,
    /// Pixel statistics of the destination inside the region
    pub stats: BlockStats,
}

impl Region {
    /// Measure a destination region
    pub fn measure(image: &RgbImage, block: Block) -> Self {
        Self {
            block,
            stats: BlockStats::measure(image, block),
        }
    }

    /// Color variance of the region
    pub fn variance(&self) -> VarianceScore {
        self.stats.variance()
    }
}

/// Regions produced at one stage and their gate decisions
#[derive(Debug, Clone)]
pub struct StagePlan {
    stage: Stage,
    regions: Vec<Region>,
    active: RegionMask,
}

impl StagePlan {
    /// Measure `blocks` of `image` and tag each against `gate`
    pub fn from_blocks<I>(stage: Stage, image: &RgbImage, blocks: I, gate: Option<u8>) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        let regions: Vec<Region> = blocks
            .into_iter()
            .map(|block| Region::measure(image, block))
            .collect();
        let active = RegionMask::from_decisions(regions.iter().map(|r| admits(r.variance(), gate)));

        debug!(
            "{stage} stage: {} regions, {} admitted for refinement",
            regions.len(),
            active.active_count()
        );

        Self {
            stage,
            regions,
            active,
        }
    }

    /// Coarse stage over a whole-image table
    ///
    /// Without thresholds every region is frozen, which is the plain
    /// non-detail rebuild.
    pub fn coarse(image: &RgbImage, table: &OffsetTable, thresholds: Option<Thresholds>) -> Self {
        let gate = thresholds.and_then(|t| t.gate_after(Stage::Coarse));
        Self::from_blocks(Stage::Coarse, image, table.blocks(), gate)
    }

    /// Stage these regions were produced at
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Regions produced at this stage
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Gate decisions for the regions
    pub const fn mask(&self) -> &RegionMask {
        &self.active
    }

    /// Regions admitted to the next stage
    pub fn active_regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions
            .iter()
            .enumerate()
            .filter(|(index, _)| self.active.is_active(*index))
            .map(|(_, region)| region)
    }

    /// Regions kept at this stage's resolution
    pub fn frozen_regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.active.is_active(*index))
            .map(|(_, region)| region)
    }

    /// Produce the next stage by subdividing the active regions
    ///
    /// Every subdivision draws its own table from `partitioner`. Frozen
    /// regions contribute nothing, so refining an all-frozen stage yields an
    /// empty stage. Returns `None` after the fine stage.
    ///
    /// # Errors
    ///
    /// Returns an error if a region cannot be partitioned
    pub fn refine(
        &self,
        image: &RgbImage,
        partitioner: &mut Partitioner,
        nominal: u32,
        non_uniform: bool,
        thresholds: Thresholds,
    ) -> Result<Option<Self>> {
        let Some(next) = self.stage.next() else {
            return Ok(None);
        };
        let size = next.block_size(nominal);

        let mut children = Vec::new();
        for region in self.active_regions() {
            let block = region.block;
            if block.is_empty() {
                continue;
            }
            let table = partitioner.partition(block.width, block.height, size, non_uniform)?;
            children.extend(table.translated(block.x, block.y));
        }

        Ok(Some(Self::from_blocks(next, image, children, thresholds.gate_after(next))))
    }
}

/// Ordered stages to render, coarsest first
#[derive(Debug, Clone)]
pub struct RefinementPlan {
    stages: Vec<StagePlan>,
}

impl RefinementPlan {
    /// Coarse stage only, every region frozen
    pub fn single(image: &RgbImage, table: &OffsetTable) -> Self {
        Self {
            stages: vec![StagePlan::coarse(image, table, None)],
        }
    }

    /// Run coarse, medium and fine gating over the destination
    ///
    /// # Errors
    ///
    /// Returns an error if a region cannot be partitioned
    pub fn build(
        image: &RgbImage,
        table: &OffsetTable,
        partitioner: &mut Partitioner,
        nominal: u32,
        non_uniform: bool,
        thresholds: Thresholds,
    ) -> Result<Self> {
        let mut stages = vec![StagePlan::coarse(image, table, Some(thresholds))];
        while let Some(last) = stages.last() {
            match last.refine(image, partitioner, nominal, non_uniform, thresholds)? {
                Some(next) => stages.push(next),
                None => break,
            }
        }
        Ok(Self { stages })
    }

    /// Stages in rendering order
    pub fn stages(&self) -> &[StagePlan] {
        &self.stages
    }

    /// Total number of regions that will be matched and placed
    pub fn region_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.regions().len()).sum()
    }
}
