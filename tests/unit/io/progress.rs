//! Tests for per-variant progress tracking

#[cfg(test)]
mod tests {
    use blockmosaic::io::progress::VariantProgress;

    // Tests completed and failed variants are counted separately
    // Verified by counting failures as completions only
    #[test]
    fn test_hidden_progress_counts() {
        let mut progress = VariantProgress::hidden(3);
        progress.variant_done("l", true);
        progress.variant_done("g", false);
        progress.variant_done("lg", true);
        progress.finish();

        assert_eq!(progress.completed(), 3);
        assert_eq!(progress.failed(), 1);
    }

    // Tests a visible bar can be driven to completion
    // Verified by finishing before any variant is recorded
    #[test]
    fn test_visible_progress_lifecycle() {
        let mut progress = VariantProgress::new("dest.png", 2);
        progress.variant_done("r", true);
        progress.variant_done("r_hdr", true);
        progress.finish();

        assert_eq!(progress.completed(), 2);
        assert_eq!(progress.failed(), 0);
    }
}
