//! Source tile partitioning and best-match search
//!
//! The source image is cut once into a fixed grid of tiles and each tile's
//! statistics are measured up front. A [`BlockMatcher`] turns those
//! statistics into one composite key per tile for a given comparison type
//! and answers destination queries against them.

use image::{Rgb, RgbImage};
use log::debug;
use ndarray::Array2;

use crate::analysis::features::BlockStats;
use crate::analysis::types::CompositeType;
use crate::io::configuration::{SOURCE_DIMENSION, SOURCE_TILE_SIZE};
use crate::io::error::{RebuildError, Result, invalid_parameter};
use crate::math::manhattan_distance;
use crate::spatial::block::Block;
use crate::spatial::partition::OffsetTable;

/// What gets written into a destination block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Copy of a source tile
    Source(Block),
    /// Solid color
    Color(Rgb<u8>),
}

/// Association of a destination block with its chosen fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// Destination block to be written
    pub dest: Block,
    /// Source tile or synthesized color
    pub fill: Fill,
}

/// Source image cut into tiles with their measured statistics
#[derive(Debug, Clone)]
pub struct SourcePartition {
    image: RgbImage,
    table: OffsetTable,
    stats: Vec<BlockStats>,
}

impl SourcePartition {
    /// Partition the fixed-size source into its uniform tile grid
    ///
    /// # Errors
    ///
    /// Returns [`RebuildError::InvalidSourceDimensions`] unless the image is
    /// exactly 512x512
    pub fn new(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width != SOURCE_DIMENSION || height != SOURCE_DIMENSION {
            return Err(RebuildError::InvalidSourceDimensions { width, height });
        }
        let table = OffsetTable::uniform(width, height, SOURCE_TILE_SIZE)?;
        Self::with_table(image, table)
    }

    /// Use an explicit tile geometry instead of the fixed grid
    ///
    /// # Errors
    ///
    /// Returns an error if the table extends past the image
    pub fn with_table(image: RgbImage, table: OffsetTable) -> Result<Self> {
        if table.width() > image.width() || table.height() > image.height() {
            return Err(invalid_parameter(
                "source_table",
                &format!("{}x{}", table.width(), table.height()),
                &format!("exceeds source image {}x{}", image.width(), image.height()),
            ));
        }

        let stats = table
            .blocks()
            .map(|block| BlockStats::measure(&image, block))
            .collect();

        Ok(Self {
            image,
            table,
            stats,
        })
    }

    /// Source pixels
    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Tile geometry
    pub const fn table(&self) -> &OffsetTable {
        &self.table
    }

    /// Statistics of every tile in partition order
    pub fn stats(&self) -> &[BlockStats] {
        &self.stats
    }

    /// Number of tiles
    pub const fn len(&self) -> usize {
        self.stats.len()
    }

    /// True when the partition holds no tiles
    pub const fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Composite key of a block: one normalized component per letter
///
/// Color-only keys hold the normalized mean color; they are used only to rank
/// blocks, never to search.
pub fn composite_key(stats: &BlockStats, composite: &CompositeType) -> Vec<f64> {
    match composite {
        CompositeType::Letters(letters) => letters.iter().map(|&base| stats.scalar(base)).collect(),
        CompositeType::ColorOnly => stats.mean().map(|channel| channel / 255.0).to_vec(),
    }
}

fn rank_value(key: &[f64]) -> f64 {
    if key.is_empty() {
        0.0
    } else {
        key.iter().sum::<f64>() / key.len() as f64
    }
}

/// Matches destination blocks against one source partition for one composite type
pub struct BlockMatcher<'a> {
    source: &'a SourcePartition,
    composite: CompositeType,
    keys: Array2<f64>,
}

impl<'a> BlockMatcher<'a> {
    /// Precompute the composite key of every source tile
    ///
    /// # Errors
    ///
    /// Returns [`RebuildError::EmptySourcePartition`] if the source has no tiles
    pub fn new(source: &'a SourcePartition, composite: &CompositeType) -> Result<Self> {
        if source.is_empty() {
            return Err(RebuildError::EmptySourcePartition);
        }

        let width = match composite {
            CompositeType::Letters(letters) => letters.len(),
            CompositeType::ColorOnly => 3,
        };
        let mut keys = Array2::zeros((source.len(), width));
        for (mut row, stats) in keys.rows_mut().into_iter().zip(source.stats()) {
            for (cell, value) in row.iter_mut().zip(composite_key(stats, composite)) {
                *cell = value;
            }
        }

        debug!(
            "Prepared {} source keys for type '{composite}'",
            source.len()
        );

        Ok(Self {
            source,
            composite: composite.clone(),
            keys,
        })
    }

    /// Composite type this matcher compares by
    pub const fn composite(&self) -> &CompositeType {
        &self.composite
    }

    /// Source key table, one row per tile
    pub const fn keys(&self) -> &Array2<f64> {
        &self.keys
    }

    /// Index and distance of the closest source tile to `key`
    ///
    /// Ties go to the tile that comes first in partition order.
    pub fn nearest(&self, key: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, row) in self.keys.rows().into_iter().enumerate() {
            let distance = manhattan_distance(row.iter(), key);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((index, distance));
            }
        }
        best
    }

    /// Choose the fill for one destination block from its statistics
    ///
    /// Color-only fills the block with its own mean color without searching.
    ///
    /// # Errors
    ///
    /// Returns [`RebuildError::EmptySourcePartition`] if no tile can be chosen
    pub fn match_stats(&self, dest: Block, stats: &BlockStats) -> Result<MatchResult> {
        if self.composite.is_color_only() {
            return Ok(MatchResult {
                dest,
                fill: Fill::Color(stats.mean_color()),
            });
        }

        let key = composite_key(stats, &self.composite);
        let (index, _) = self
            .nearest(&key)
            .ok_or(RebuildError::EmptySourcePartition)?;
        let tile = self
            .source
            .table()
            .block(index)
            .ok_or(RebuildError::EmptySourcePartition)?;

        Ok(MatchResult {
            dest,
            fill: Fill::Source(tile),
        })
    }

    /// Rank-scaled matching over a whole set of destination blocks
    ///
    /// Destination blocks and source tiles are each ordered by the mean of
    /// their composite key; the block at rank `i` of `n` takes the tile at
    /// rank `i * m / n`, so every tile is used when `n >= m`. Color-only
    /// blocks take the mean color of their ranked tile. Results follow the
    /// input order.
    ///
    /// # Errors
    ///
    /// Returns [`RebuildError::EmptySourcePartition`] if a ranked tile is missing
    pub fn match_ranked(&self, regions: &[(Block, &BlockStats)]) -> Result<Vec<MatchResult>> {
        let mut source_order: Vec<(usize, f64)> = self
            .keys
            .rows()
            .into_iter()
            .map(|row| rank_value(&row.to_vec()))
            .enumerate()
            .collect();
        source_order.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut dest_order: Vec<(usize, f64)> = regions
            .iter()
            .map(|(_, stats)| rank_value(&composite_key(stats, &self.composite)))
            .enumerate()
            .collect();
        dest_order.sort_by(|a, b| a.1.total_cmp(&b.1));

        let (n, m) = (regions.len(), source_order.len());
        let mut results: Vec<Option<MatchResult>> = vec![None; n];

        for (rank, &(dest_index, _)) in dest_order.iter().enumerate() {
            let &(tile_index, _) = source_order
                .get(rank * m / n)
                .ok_or(RebuildError::EmptySourcePartition)?;
            let Some(&(dest, _)) = regions.get(dest_index) else {
                continue;
            };

            let fill = if self.composite.is_color_only() {
                let stats = self
                    .source
                    .stats()
                    .get(tile_index)
                    .ok_or(RebuildError::EmptySourcePartition)?;
                Fill::Color(stats.mean_color())
            } else {
                let tile = self
                    .source
                    .table()
                    .block(tile_index)
                    .ok_or(RebuildError::EmptySourcePartition)?;
                Fill::Source(tile)
            };

            if let Some(slot) = results.get_mut(dest_index) {
                *slot = Some(MatchResult { dest, fill });
            }
        }

        Ok(results.into_iter().flatten().collect())
    }
}

/// Match one destination block of `image` against `source`
///
/// One-shot form of [`BlockMatcher::match_stats`]; rendering many blocks
/// should build the matcher once instead.
///
/// # Errors
///
/// Returns [`RebuildError::EmptySourcePartition`] if the source has no tiles
pub fn match_block(
    image: &RgbImage,
    dest: Block,
    source: &SourcePartition,
    composite: &CompositeType,
) -> Result<MatchResult> {
    let stats = BlockStats::measure(image, dest);
    BlockMatcher::new(source, composite)?.match_stats(dest, &stats)
}
