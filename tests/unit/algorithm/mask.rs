//! Tests for `RegionMask` tagging of active and frozen regions

#[cfg(test)]
mod tests {
    use blockmosaic::algorithm::mask::RegionMask;

    // Tests gate decisions map to bit positions in order
    // Verified by reversing the decision iterator
    #[test]
    fn test_from_decisions() {
        let mask = RegionMask::from_decisions([true, false, false, true, true]);
        assert_eq!(mask.len(), 5);
        assert_eq!(mask.active_indices(), vec![0, 3, 4]);
        assert_eq!(mask.active_count(), 3);
        assert!(mask.is_active(3));
        assert!(!mask.is_active(1));
    }

    // Tests an all-rejected stage has no active regions
    // Verified by initializing the mask with all bits set
    #[test]
    fn test_all_frozen() {
        let mask = RegionMask::from_decisions([false; 10]);
        assert_eq!(mask.len(), 10);
        assert_eq!(mask.active_count(), 0);
        assert!(mask.active_indices().is_empty());
    }

    // Tests indices past the end read as frozen
    // Verified by treating missing bits as active
    #[test]
    fn test_out_of_range_is_frozen() {
        let mask = RegionMask::from_decisions([true, true]);
        assert!(mask.is_active(1));
        assert!(!mask.is_active(2));
        assert!(!mask.is_active(usize::MAX));
    }

    // Tests empty masks and display formatting
    // Verified by swapping the counts in the display output
    #[test]
    fn test_empty_and_display() {
        let empty = RegionMask::from_decisions(std::iter::empty());
        assert!(empty.is_empty());

        let mask = RegionMask::from_decisions([true, false]);
        assert_eq!(mask.to_string(), "RegionMask(1 active / 2 regions)");
    }
}
