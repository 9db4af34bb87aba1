//! Image comparison metrics for exported captures.
//!
//! All outputs are rounded to a fixed precision so reports are
//! byte-identical across runs on the same input.

pub mod ssim;

pub use ssim::calculate_ssim;

/// Decimal places kept in reported metrics.
pub const FLOAT_PRECISION: i32 = 6;

/// Round a float to `decimals` places.
pub fn round_f64(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Absolute 8-bit difference statistics between two equally sized images.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsDiffMetrics {
    /// Mean absolute difference per channel sample, 0-255.
    pub mean: f64,
    /// Largest absolute difference of any channel sample.
    pub max: u8,
    /// Pixels with at least one differing channel.
    pub differing_pixels: u64,
}

/// Compare two interleaved 8-bit buffers with `channels` samples per pixel.
///
/// Returns `None` if the buffers differ in length.
pub fn abs_diff(pixels_a: &[u8], pixels_b: &[u8], channels: usize) -> Option<AbsDiffMetrics> {
    if pixels_a.len() != pixels_b.len() || channels == 0 {
        return None;
    }
    if pixels_a.is_empty() {
        return Some(AbsDiffMetrics {
            mean: 0.0,
            max: 0,
            differing_pixels: 0,
        });
    }

    let mut sum = 0u64;
    let mut max = 0u8;
    let mut differing_pixels = 0u64;
    for (a, b) in pixels_a.chunks(channels).zip(pixels_b.chunks(channels)) {
        let mut differs = false;
        for (&x, &y) in a.iter().zip(b) {
            let d = x.abs_diff(y);
            sum += d as u64;
            max = max.max(d);
            differs |= d > 0;
        }
        if differs {
            differing_pixels += 1;
        }
    }

    Some(AbsDiffMetrics {
        mean: round_f64(sum as f64 / pixels_a.len() as f64, FLOAT_PRECISION),
        max,
        differing_pixels,
    })
}
