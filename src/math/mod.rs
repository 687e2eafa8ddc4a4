//! Mathematical utilities for feature comparison

/// Luminance and HSV conversions
pub mod color;

/// Sum of absolute component differences between two feature keys
///
/// Components beyond the shorter slice are ignored. Used as the block
/// matching distance so every comparison letter contributes linearly.
pub fn manhattan_distance<'a, I>(a: I, b: &[f64]) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    a.into_iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}
