//! Block partitioning into uniform or randomized non-uniform grids
//!
//! A partition is stored as an [`OffsetTable`]: the column and row boundaries
//! of one image. Column widths and row heights are chosen independently, so a
//! non-uniform table is a non-regular grid whose cells still tile the image
//! exactly. Tables are generated once and then only read.

use log::warn;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::io::configuration::{MIN_BLOCK_SIZE, MIN_DETAIL_BLOCK_SIZE, NON_UNIFORM_SPREAD_DIVISOR};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::block::Block;

/// Block geometry of one partitioning pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetTable {
    column_bounds: Vec<u32>,
    row_bounds: Vec<u32>,
}

impl OffsetTable {
    /// Build a table from explicit column and row boundaries
    ///
    /// Both lists must start at 0 and be strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns an error if either list has fewer than two entries, does not
    /// start at 0, or is not strictly increasing
    pub fn from_bounds(column_bounds: Vec<u32>, row_bounds: Vec<u32>) -> Result<Self> {
        for (name, bounds) in [("columns", &column_bounds), ("rows", &row_bounds)] {
            let increasing = bounds.windows(2).all(|pair| match pair {
                [a, b] => a < b,
                _ => true,
            });
            if bounds.len() < 2 || bounds.first() != Some(&0) || !increasing {
                return Err(invalid_parameter(
                    "offset_table",
                    &format!("{bounds:?}"),
                    &format!("{name} must start at 0 and strictly increase"),
                ));
            }
        }

        Ok(Self {
            column_bounds,
            row_bounds,
        })
    }

    /// Uniform grid of `size` x `size` blocks with truncated last row and column
    ///
    /// # Errors
    ///
    /// Returns an error if `size`, `width` or `height` is zero
    pub fn uniform(width: u32, height: u32, size: u32) -> Result<Self> {
        validate_request(width, height, size)?;
        Ok(Self {
            column_bounds: uniform_bounds(width, size),
            row_bounds: uniform_bounds(height, size),
        })
    }

    /// Number of block columns
    pub const fn columns(&self) -> usize {
        self.column_bounds.len().saturating_sub(1)
    }

    /// Number of block rows
    pub const fn rows(&self) -> usize {
        self.row_bounds.len().saturating_sub(1)
    }

    /// Total number of blocks
    pub const fn len(&self) -> usize {
        self.columns() * self.rows()
    }

    /// True when the table holds no blocks
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of the partitioned area
    pub fn width(&self) -> u32 {
        self.column_bounds.last().copied().unwrap_or(0)
    }

    /// Height of the partitioned area
    pub fn height(&self) -> u32 {
        self.row_bounds.last().copied().unwrap_or(0)
    }

    /// Width of every block column, left to right
    pub fn column_widths(&self) -> Vec<u32> {
        spans(&self.column_bounds)
    }

    /// Height of every block row, top to bottom
    pub fn row_heights(&self) -> Vec<u32> {
        spans(&self.row_bounds)
    }

    /// Block at a row-major index
    pub fn block(&self, index: usize) -> Option<Block> {
        let columns = self.columns();
        if columns == 0 {
            return None;
        }
        let (row, col) = (index / columns, index % columns);
        let x = *self.column_bounds.get(col)?;
        let right = *self.column_bounds.get(col + 1)?;
        let y = *self.row_bounds.get(row)?;
        let bottom = *self.row_bounds.get(row + 1)?;
        Some(Block::new(x, y, right - x, bottom - y))
    }

    /// Iterate all blocks in row-major order
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        (0..self.len()).filter_map(|index| self.block(index))
    }

    /// Same geometry shifted by an origin, used when subdividing a region
    #[must_use]
    pub fn translated(&self, dx: u32, dy: u32) -> Vec<Block> {
        self.blocks()
            .map(|block| block.translated(dx, dy))
            .collect()
    }
}

fn spans(bounds: &[u32]) -> Vec<u32> {
    bounds
        .windows(2)
        .map(|pair| match pair {
            [a, b] => b - a,
            _ => 0,
        })
        .collect()
}

fn uniform_bounds(extent: u32, size: u32) -> Vec<u32> {
    let mut bounds: Vec<u32> = (0..extent).step_by(size as usize).collect();
    bounds.push(extent);
    bounds
}

fn validate_request(width: u32, height: u32, size: u32) -> Result<()> {
    if size == 0 {
        return Err(invalid_parameter("block_size", &size, &"must be positive"));
    }
    if width == 0 || height == 0 {
        return Err(invalid_parameter(
            "dimensions",
            &format!("{width}x{height}"),
            &"cannot partition an empty image",
        ));
    }
    Ok(())
}

/// Clamp a requested block size to a usable value
///
/// Sizes below the minimum (larger in detail mode, which halves the size
/// twice) are raised to it, and odd sizes are rounded down to even. The
/// corrected value is the one that names the output.
pub fn correct_block_size(requested: u32, detail: bool) -> u32 {
    let minimum = if detail {
        MIN_DETAIL_BLOCK_SIZE
    } else {
        MIN_BLOCK_SIZE
    };

    if requested < minimum {
        warn!("Block size {requested} too small, clamped to {minimum}");
        return minimum;
    }

    if requested.is_multiple_of(2) {
        requested
    } else {
        let even = requested - 1;
        warn!("Block size {requested} is odd, changed to {even}");
        even
    }
}

/// Seeded block partitioner
///
/// Uniform partitions ignore the generator. Non-uniform partitions draw a
/// fresh table on every call, so one call per pass yields geometry that every
/// comparison variant can share while separate runs differ.
#[derive(Debug, Clone)]
pub struct Partitioner {
    rng: StdRng,
}

impl Partitioner {
    /// Create a deterministic partitioner
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Partition a `width` x `height` area into blocks of roughly `target` pixels
    ///
    /// # Errors
    ///
    /// Returns an error if `target`, `width` or `height` is zero
    pub fn partition(
        &mut self,
        width: u32,
        height: u32,
        target: u32,
        non_uniform: bool,
    ) -> Result<OffsetTable> {
        if !non_uniform {
            return OffsetTable::uniform(width, height, target);
        }

        validate_request(width, height, target)?;
        let column_bounds = self.random_bounds(width, target);
        let row_bounds = self.random_bounds(height, target);
        Ok(OffsetTable {
            column_bounds,
            row_bounds,
        })
    }

    /// Draw boundaries with spans from `target ± target / 3`
    ///
    /// The range is symmetric, so the mean span converges to `target`; the
    /// last span is truncated at `extent`.
    fn random_bounds(&mut self, extent: u32, target: u32) -> Vec<u32> {
        let spread = target / NON_UNIFORM_SPREAD_DIVISOR;
        let (low, high) = (target - spread, target + spread);

        let mut bounds = vec![0];
        let mut position = 0;
        while position < extent {
            let span = if spread == 0 {
                target
            } else {
                self.rng.random_range(low..=high)
            };
            position = position.saturating_add(span).min(extent);
            bounds.push(position);
        }
        bounds
    }
}
