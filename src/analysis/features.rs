//! Per-block feature extraction for each comparison type
//!
//! Statistics are measured once per block ([`BlockStats`]) and every feature
//! is a pure function of them, so extracting the same block twice yields
//! bit-identical values.

use image::{Rgb, RgbImage};
use std::collections::HashSet;
use std::fmt;

use crate::analysis::variance::VarianceScore;
use crate::io::configuration::COLOR_ONLY_LETTER;
use crate::io::error::{RebuildError, Result};
use crate::math::color::{luminance, rgb_to_hsv};
use crate::spatial::block::Block;

/// Single comparison dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseType {
    /// Weighted luminance (`l`)
    Luminance,
    /// HSV hue of the mean color (`h`)
    Hue,
    /// HSV saturation of the mean color (`s`)
    Saturation,
    /// HSV value of the mean color (`v`)
    Value,
    /// Mean red channel (`r`)
    Red,
    /// Mean green channel (`g`)
    Green,
    /// Mean blue channel (`b`)
    Blue,
}

impl BaseType {
    /// All base types in canonical letter order
    pub const ALL: [Self; 7] = [
        Self::Luminance,
        Self::Hue,
        Self::Saturation,
        Self::Value,
        Self::Red,
        Self::Green,
        Self::Blue,
    ];

    /// Parse a comparison letter
    ///
    /// # Errors
    ///
    /// Returns [`RebuildError::InvalidType`] for letters outside `lhsvrgb`
    pub const fn from_letter(letter: char) -> Result<Self> {
        match letter {
            'l' => Ok(Self::Luminance),
            'h' => Ok(Self::Hue),
            's' => Ok(Self::Saturation),
            'v' => Ok(Self::Value),
            'r' => Ok(Self::Red),
            'g' => Ok(Self::Green),
            'b' => Ok(Self::Blue),
            _ => Err(RebuildError::InvalidType { letter }),
        }
    }

    /// Letter naming this type
    pub const fn letter(self) -> char {
        match self {
            Self::Luminance => 'l',
            Self::Hue => 'h',
            Self::Saturation => 's',
            Self::Value => 'v',
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Blue => 'b',
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// What to extract from a block: one base dimension or the full mean color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Scalar feature along one dimension
    Base(BaseType),
    /// Mean RGB color, not reduced to a scalar
    Color,
}

impl FeatureKind {
    /// Parse a comparison letter, including `c` for color
    ///
    /// # Errors
    ///
    /// Returns [`RebuildError::InvalidType`] for letters outside `lhsvrgbc`
    pub fn from_letter(letter: char) -> Result<Self> {
        if letter == COLOR_ONLY_LETTER {
            Ok(Self::Color)
        } else {
            BaseType::from_letter(letter).map(Self::Base)
        }
    }
}

/// Feature derived from one block for one comparison type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    /// Normalized scalar in `[0, 1]`
    Scalar(f64),
    /// Mean RGB color on the 0-255 scale
    Color([f64; 3]),
}

/// Raw statistics of one block's pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStats {
    channel_sums: [u64; 3],
    pixel_count: u64,
    unique_colors: u64,
}

impl BlockStats {
    /// Measure a block of `image` in one pass over its pixels
    pub fn measure(image: &RgbImage, block: Block) -> Self {
        let mut channel_sums = [0u64; 3];
        let mut pixel_count = 0u64;
        let mut colors: HashSet<[u8; 3]> = HashSet::new();

        for pixel in block.pixels(image) {
            for (sum, &channel) in channel_sums.iter_mut().zip(&pixel.0) {
                *sum += u64::from(channel);
            }
            colors.insert(pixel.0);
            pixel_count += 1;
        }

        Self {
            channel_sums,
            pixel_count,
            unique_colors: colors.len() as u64,
        }
    }

    /// Number of pixels measured
    pub const fn pixel_count(&self) -> u64 {
        self.pixel_count
    }

    /// Number of distinct colors among the measured pixels
    pub const fn unique_colors(&self) -> u64 {
        self.unique_colors
    }

    /// Mean color per channel, zero for an empty block
    pub fn mean(&self) -> [f64; 3] {
        if self.pixel_count == 0 {
            return [0.0; 3];
        }
        let count = self.pixel_count as f64;
        self.channel_sums.map(|sum| sum as f64 / count)
    }

    /// Mean color rounded to the nearest 8-bit value
    pub fn mean_color(&self) -> Rgb<u8> {
        let mean = self.mean();
        Rgb(mean.map(|channel| channel.round().clamp(0.0, 255.0) as u8))
    }

    /// Color variance score of the block
    pub fn variance(&self) -> VarianceScore {
        VarianceScore::from_counts(self.unique_colors, self.pixel_count)
    }

    /// Normalized scalar feature along one dimension
    pub fn scalar(&self, base: BaseType) -> f64 {
        let mean = self.mean();
        let [r, g, b] = mean;
        match base {
            BaseType::Luminance => luminance(mean) / 255.0,
            BaseType::Hue => rgb_to_hsv(mean).0 / 360.0,
            BaseType::Saturation => rgb_to_hsv(mean).1,
            BaseType::Value => rgb_to_hsv(mean).2 / 255.0,
            BaseType::Red => r / 255.0,
            BaseType::Green => g / 255.0,
            BaseType::Blue => b / 255.0,
        }
    }

    /// Feature for the given kind
    pub fn feature(&self, kind: FeatureKind) -> FeatureValue {
        match kind {
            FeatureKind::Base(base) => FeatureValue::Scalar(self.scalar(base)),
            FeatureKind::Color => FeatureValue::Color(self.mean()),
        }
    }
}

/// Extract the feature of `block` in `image` for one comparison kind
pub fn extract(image: &RgbImage, block: Block, kind: FeatureKind) -> FeatureValue {
    BlockStats::measure(image, block).feature(kind)
}

/// Extract a feature named by its comparison letter
///
/// # Errors
///
/// Returns [`RebuildError::InvalidType`] when `letter` is not one of
/// `l`, `h`, `s`, `v`, `r`, `g`, `b` or `c`
pub fn extract_letter(image: &RgbImage, block: Block, letter: char) -> Result<FeatureValue> {
    let kind = FeatureKind::from_letter(letter)?;
    Ok(extract(image, block, kind))
}
