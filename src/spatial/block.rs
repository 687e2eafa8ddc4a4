//! Rectangular block views over image pixel data

use image::{Rgb, RgbImage};

/// Rectangular region of an image, given by origin and extent
///
/// A block never owns pixels; it addresses a range of the image it was
/// partitioned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Block {
    /// Create a block from origin and extent
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered by the block
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Exclusive right edge
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when the block has no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Shift the block origin by the given offset
    #[must_use]
    pub const fn translated(self, dx: u32, dy: u32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Check whether the block lies entirely inside a `width` x `height` image
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Check whether two blocks share at least one pixel
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Iterate the block's pixels row by row
    ///
    /// Pixels falling outside the image are skipped rather than panicking.
    pub fn pixels(self, image: &RgbImage) -> impl Iterator<Item = &Rgb<u8>> + '_ {
        let (x0, x1) = (self.x, self.right());
        (self.y..self.bottom())
            .flat_map(move |y| (x0..x1).filter_map(move |x| image.get_pixel_checked(x, y)))
    }
}
