//! Windowed SSIM over 8-bit luminance.

use super::{round_f64, FLOAT_PRECISION};

/// `(0.01 * 255)^2`
const C1: f64 = 6.5025;
/// `(0.03 * 255)^2`
const C2: f64 = 58.5225;

/// Side of the non-overlapping square windows.
const WINDOW: usize = 8;

/// Mean SSIM of two equally sized images.
///
/// `channels` is 1 (gray) or 3 (RGB). Images smaller than one window are
/// compared as a single window. Mismatched buffers score 0.
pub fn calculate_ssim(
    pixels_a: &[u8],
    pixels_b: &[u8],
    width: u32,
    height: u32,
    channels: u8,
) -> f64 {
    let (w, h, ch) = (width as usize, height as usize, channels as usize);
    if pixels_a.len() != pixels_b.len() || pixels_a.len() < w * h * ch || ch == 0 {
        return 0.0;
    }

    let lum_a = luminance(pixels_a, w * h, ch);
    let lum_b = luminance(pixels_b, w * h, ch);

    let (cols, rows) = (w / WINDOW, h / WINDOW);
    if cols == 0 || rows == 0 {
        return round_f64(window_ssim(&lum_a, &lum_b), FLOAT_PRECISION);
    }

    let mut total = 0.0;
    let mut win_a = Vec::with_capacity(WINDOW * WINDOW);
    let mut win_b = Vec::with_capacity(WINDOW * WINDOW);
    for row in 0..rows {
        for col in 0..cols {
            win_a.clear();
            win_b.clear();
            for dy in 0..WINDOW {
                let start = (row * WINDOW + dy) * w + col * WINDOW;
                win_a.extend_from_slice(&lum_a[start..start + WINDOW]);
                win_b.extend_from_slice(&lum_b[start..start + WINDOW]);
            }
            total += window_ssim(&win_a, &win_b);
        }
    }

    round_f64(total / (rows * cols) as f64, FLOAT_PRECISION)
}

/// BT.601 luma on the 0-255 scale.
fn luminance(pixels: &[u8], count: usize, channels: usize) -> Vec<f64> {
    pixels
        .chunks(channels)
        .take(count)
        .map(|p| match p {
            [r, g, b, ..] => 0.299 * *r as f64 + 0.587 * *g as f64 + 0.114 * *b as f64,
            [v, ..] => *v as f64,
            [] => 0.0,
        })
        .collect()
}

fn window_ssim(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let (mut var_a, mut var_b, mut cov) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (da, db) = (x - mean_a, y - mean_b);
        var_a += da * da;
        var_b += db * db;
        cov += da * db;
    }
    var_a /= n;
    var_b /= n;
    cov /= n;

    let numerator = (2.0 * mean_a * mean_b + C1) * (2.0 * cov + C2);
    let denominator = (mean_a * mean_a + mean_b * mean_b + C1) * (var_a + var_b + C2);
    if denominator > 0.0 {
        numerator / denominator
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| {
                let v = ((i % width) * 255 / width.max(1)) as u8;
                [v, v, v]
            })
            .collect()
    }

    #[test]
    fn test_identical_images_score_one() {
        let img = gradient(32, 16);
        assert_eq!(calculate_ssim(&img, &img, 32, 16, 3), 1.0);
    }

    #[test]
    fn test_inverted_image_scores_low() {
        let img = gradient(32, 32);
        let inverted: Vec<u8> = img.iter().map(|v| 255 - v).collect();
        assert!(calculate_ssim(&img, &inverted, 32, 32, 3) < 0.5);
    }

    #[test]
    fn test_small_noise_scores_high() {
        let img = gradient(32, 32);
        let noisy: Vec<u8> = img
            .iter()
            .enumerate()
            .map(|(i, v)| if i % 7 == 0 { v.saturating_add(2) } else { *v })
            .collect();
        let score = calculate_ssim(&img, &noisy, 32, 32, 3);
        assert!(score > 0.9 && score < 1.0, "score {}", score);
    }

    #[test]
    fn test_tiny_image_uses_single_window() {
        let a = vec![10u8, 20, 30, 40];
        assert_eq!(calculate_ssim(&a, &a, 2, 2, 1), 1.0);
    }

    #[test]
    fn test_mismatched_lengths() {
        assert_eq!(calculate_ssim(&[0; 12], &[0; 9], 2, 2, 3), 0.0);
    }
}
