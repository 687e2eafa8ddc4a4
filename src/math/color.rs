//! Color space helpers shared by feature extraction

/// ITU-R BT.601 luma weights for red, green and blue
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Weighted luminance of an RGB triple, on the same 0-255 scale as the input
pub fn luminance(rgb: [f64; 3]) -> f64 {
    let [r, g, b] = rgb;
    LUMA_WEIGHTS[2].mul_add(b, LUMA_WEIGHTS[0].mul_add(r, LUMA_WEIGHTS[1] * g))
}

/// Convert an RGB triple (0-255 channels) to HSV
///
/// Returns hue in degrees `[0, 360)`, saturation in `[0, 1]` and value on the
/// 0-255 scale of the input. Hue is 0 for grays and black.
pub fn rgb_to_hsv(rgb: [f64; 3]) -> (f64, f64, f64) {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if max <= 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let saturation = delta / max;

    if delta <= 0.0 {
        return (0.0, saturation, max);
    }

    // Sector offsets: red 0, green 2, blue 4
    #[allow(clippy::float_cmp)]
    let sector = if r == max {
        (g - b) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };

    let mut hue = sector * 60.0;
    if hue < 0.0 {
        hue += 360.0;
    }

    (hue, saturation, max)
}
