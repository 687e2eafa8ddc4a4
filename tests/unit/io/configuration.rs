//! Tests for rebuild constants and their relationships

#[cfg(test)]
mod tests {
    use blockmosaic::io::configuration::{
        ALL_TYPE_LETTERS, COLOR_ONLY_LETTER, DEFAULT_BLOCK_SIZE, DEFAULT_MEDIUM_THRESHOLD,
        DEFAULT_OUTPUT_DIRECTORY, DEFAULT_SMALL_THRESHOLD, HDR_SUFFIX, MAX_THRESHOLD,
        MIN_BLOCK_SIZE, MIN_DETAIL_BLOCK_SIZE, MIN_THRESHOLD, NON_UNIFORM_SPREAD_DIVISOR,
        OUTPUT_EXTENSION, SOURCE_DIMENSION, SOURCE_TILE_SIZE,
    };

    // Tests the source is cut into a 16x16 grid
    // Verified by changing the tile size to 30
    #[test]
    fn test_source_grid() {
        assert_eq!(SOURCE_DIMENSION, 512);
        assert_eq!(SOURCE_DIMENSION % SOURCE_TILE_SIZE, 0);
        assert_eq!(SOURCE_DIMENSION / SOURCE_TILE_SIZE, 16);
    }

    // Tests block size defaults and minimums
    // Verified by lowering the detail minimum to the plain minimum
    #[test]
    fn test_block_size_limits() {
        assert_eq!(DEFAULT_BLOCK_SIZE, 30);
        assert_eq!(MIN_BLOCK_SIZE, 4);
        assert_eq!(MIN_DETAIL_BLOCK_SIZE, 8);
        assert_eq!(DEFAULT_BLOCK_SIZE % 2, 0);
    }

    // Tests default thresholds lie inside the accepted range
    // Verified by setting the small default to eleven
    #[test]
    fn test_threshold_defaults_in_range() {
        let range = MIN_THRESHOLD..=MAX_THRESHOLD;
        assert_eq!((MIN_THRESHOLD, MAX_THRESHOLD), (1, 10));
        assert!(range.contains(&DEFAULT_MEDIUM_THRESHOLD));
        assert!(range.contains(&DEFAULT_SMALL_THRESHOLD));
        assert!(DEFAULT_MEDIUM_THRESHOLD < DEFAULT_SMALL_THRESHOLD);
    }

    // Tests letters, spread and output naming settings
    // Verified by adding the color letter to the full letter set
    #[test]
    fn test_letters_and_output_settings() {
        assert_eq!(ALL_TYPE_LETTERS.len(), 7);
        assert!(!ALL_TYPE_LETTERS.contains(COLOR_ONLY_LETTER));
        assert_eq!(NON_UNIFORM_SPREAD_DIVISOR, 3);
        assert_eq!(DEFAULT_OUTPUT_DIRECTORY, "output");
        assert_eq!(OUTPUT_EXTENSION, "tif");
        assert_eq!(HDR_SUFFIX, "_hdr");
    }
}
