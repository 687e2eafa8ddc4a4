//! Output canvas assembly from matched blocks

use image::RgbImage;
use image::imageops::{self, FilterType};
use rand::Rng;

use crate::algorithm::matcher::{Fill, MatchResult};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::block::Block;

/// Mirror applied to a source tile before placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mirror {
    /// Tile is used as cut
    #[default]
    None,
    /// Left-right reflection
    Horizontal,
    /// Top-bottom reflection
    Vertical,
}

/// Mirror and rotation applied to a source tile before placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    /// Reflection applied first
    pub mirror: Mirror,
    /// Clockwise quarter turns applied after the reflection (0-3)
    pub quarter_turns: u8,
}

impl Orientation {
    /// Tile placed exactly as cut
    pub const IDENTITY: Self = Self {
        mirror: Mirror::None,
        quarter_turns: 0,
    };

    /// Draw a random orientation from the enabled transformations
    pub fn random<R: Rng>(rng: &mut R, rotations: bool, reflections: bool) -> Self {
        let mirror = if reflections {
            match rng.random_range(0..3u8) {
                1 => Mirror::Horizontal,
                2 => Mirror::Vertical,
                _ => Mirror::None,
            }
        } else {
            Mirror::None
        };
        let quarter_turns = if rotations {
            rng.random_range(0..4u8)
        } else {
            0
        };
        Self {
            mirror,
            quarter_turns,
        }
    }

    /// Apply the orientation to a tile
    pub fn apply(self, tile: RgbImage) -> RgbImage {
        let mirrored = match self.mirror {
            Mirror::None => tile,
            Mirror::Horizontal => imageops::flip_horizontal(&tile),
            Mirror::Vertical => imageops::flip_vertical(&tile),
        };
        match self.quarter_turns % 4 {
            1 => imageops::rotate90(&mirrored),
            2 => imageops::rotate180(&mirrored),
            3 => imageops::rotate270(&mirrored),
            _ => mirrored,
        }
    }
}

/// Canvas that matched blocks are written into
///
/// Writes are hard-edged and later writes replace earlier ones, so finer
/// detail stages must be placed after coarser ones.
#[derive(Debug, Clone)]
pub struct Compositor {
    canvas: RgbImage,
}

impl Compositor {
    /// Allocate a black canvas of the destination size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbImage::new(width, height),
        }
    }

    /// Write one match into the canvas
    ///
    /// Source tiles are cropped from `source`, oriented, and resized with
    /// nearest-neighbour sampling when their extent differs from the
    /// destination block (edge blocks, non-uniform blocks, detail stages).
    ///
    /// # Errors
    ///
    /// Returns an error if the destination block lies outside the canvas or
    /// the source tile lies outside `source`
    pub fn place(
        &mut self,
        source: &RgbImage,
        result: &MatchResult,
        orientation: Orientation,
    ) -> Result<()> {
        let dest = result.dest;
        if !dest.fits_within(self.canvas.width(), self.canvas.height()) {
            return Err(out_of_bounds("dest_block", dest, &self.canvas));
        }
        if dest.is_empty() {
            return Ok(());
        }

        let patch = match result.fill {
            Fill::Source(tile) => {
                if tile.is_empty() || !tile.fits_within(source.width(), source.height()) {
                    return Err(out_of_bounds("source_tile", tile, source));
                }
                let cut =
                    imageops::crop_imm(source, tile.x, tile.y, tile.width, tile.height).to_image();
                let oriented = orientation.apply(cut);
                if oriented.dimensions() == (dest.width, dest.height) {
                    oriented
                } else {
                    imageops::resize(&oriented, dest.width, dest.height, FilterType::Nearest)
                }
            }
            Fill::Color(color) => RgbImage::from_pixel(dest.width, dest.height, color),
        };

        imageops::replace(
            &mut self.canvas,
            &patch,
            i64::from(dest.x),
            i64::from(dest.y),
        );
        Ok(())
    }

    /// Canvas in its current state
    pub const fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    /// Finalize and return the canvas
    pub fn finish(self) -> RgbImage {
        self.canvas
    }
}

fn out_of_bounds(parameter: &'static str, block: Block, image: &RgbImage) -> crate::RebuildError {
    invalid_parameter(
        parameter,
        &format!("{}x{}+{}+{}", block.width, block.height, block.x, block.y),
        &format!("outside {}x{} image", image.width(), image.height()),
    )
}

/// Assemble a canvas of `width` x `height` from `placements`, in order
///
/// # Errors
///
/// Returns an error if any placement lies outside the canvas or the source
pub fn composite(
    width: u32,
    height: u32,
    source: &RgbImage,
    placements: &[MatchResult],
) -> Result<RgbImage> {
    let mut compositor = Compositor::new(width, height);
    for placement in placements {
        compositor.place(source, placement, Orientation::IDENTITY)?;
    }
    Ok(compositor.finish())
}
