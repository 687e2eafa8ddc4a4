//! Rebuild constants and runtime configuration defaults

/// Required width and height of the source image in pixels
pub const SOURCE_DIMENSION: u32 = 512;

// 16 x 16 tiles over the fixed source
/// Side length of one source tile in pixels
pub const SOURCE_TILE_SIZE: u32 = 32;

/// Destination block size used when none is given
pub const DEFAULT_BLOCK_SIZE: u32 = 30;

/// Smallest usable destination block size
pub const MIN_BLOCK_SIZE: u32 = 4;

// Fine stage divides the nominal size by four
/// Smallest usable destination block size in detail mode
pub const MIN_DETAIL_BLOCK_SIZE: u32 = 8;

/// Default variance threshold gating the medium stage
pub const DEFAULT_MEDIUM_THRESHOLD: u8 = 5;

/// Default variance threshold gating the fine stage
pub const DEFAULT_SMALL_THRESHOLD: u8 = 8;

/// Lowest accepted variance threshold
pub const MIN_THRESHOLD: u8 = 1;

/// Highest accepted variance threshold (also the variance score ceiling)
pub const MAX_THRESHOLD: u8 = 10;

/// Non-uniform sizes vary by at most `size / NON_UNIFORM_SPREAD_DIVISOR` either way
pub const NON_UNIFORM_SPREAD_DIVISOR: u32 = 3;

/// Every comparison letter in canonical order
pub const ALL_TYPE_LETTERS: &str = "lhsvrgb";

/// Letter naming the color-only type
pub const COLOR_ONLY_LETTER: char = 'c';

// Output settings
/// Directory rebuilt images are written to by default
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "output";
/// File extension of rebuilt images
pub const OUTPUT_EXTENSION: &str = "tif";
/// Suffix appended to rank-matched variant names
pub const HDR_SUFFIX: &str = "_hdr";
