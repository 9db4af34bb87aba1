//! Compare command implementation
//!
//! Compares two exported PNGs and reports perceptual and absolute
//! difference metrics.

use anyhow::{Context, Result};
use colored::Colorize;
use normprobe_core::png::read_rgb;
use std::fs;
use std::process::ExitCode;

use super::emit_json;
use super::json_output::{error_codes, CompareResult};
use crate::analysis::{abs_diff, calculate_ssim};

/// Run the compare command
///
/// # Arguments
/// * `path_a` - Path to the first file (reference)
/// * `path_b` - Path to the second file (comparison target)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(path_a: &str, path_b: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        emit_json(compare(path_a, path_b), error_codes::COMPARE)
    } else {
        run_human(path_a, path_b)
    }
}

fn run_human(path_a: &str, path_b: &str) -> Result<ExitCode> {
    println!("{}", "Comparing files:".cyan().bold());
    println!("  {} {}", "A:".dimmed(), path_a);
    println!("  {} {}", "B:".dimmed(), path_b);

    let result = compare(path_a, path_b)?;

    println!("{} {}", "Hash A:".dimmed(), &result.hash_a[..16]);
    println!("{} {}", "Hash B:".dimmed(), &result.hash_b[..16]);
    if result.identical {
        println!("\n{}", "Files are byte-identical!".green().bold());
    }

    println!("\n{}", "Comparison Metrics:".cyan().bold());
    println!("  {} {}x{}", "Size:".dimmed(), result.width, result.height);
    println!("  {} {:.6}", "SSIM:".dimmed(), result.ssim);
    println!("  {} {:.6}", "Mean |A-B|:".dimmed(), result.mean_abs_diff);
    println!("  {} {}", "Max |A-B|:".dimmed(), result.max_abs_diff);
    println!("  {} {}", "Differing pixels:".dimmed(), result.differing_pixels);
    Ok(ExitCode::SUCCESS)
}

/// Load both images and compute the metrics; shared by both output modes.
pub fn compare(path_a: &str, path_b: &str) -> Result<CompareResult> {
    let data_a = fs::read(path_a).with_context(|| format!("Failed to read file A: {}", path_a))?;
    let data_b = fs::read(path_b).with_context(|| format!("Failed to read file B: {}", path_b))?;

    let hash_a = blake3::hash(&data_a).to_hex().to_string();
    let hash_b = blake3::hash(&data_b).to_hex().to_string();

    let image_a = read_rgb(data_a.as_slice())
        .with_context(|| format!("Failed to decode {}", path_a))?;
    let image_b = read_rgb(data_b.as_slice())
        .with_context(|| format!("Failed to decode {}", path_b))?;
    if (image_a.width, image_a.height) != (image_b.width, image_b.height) {
        anyhow::bail!(
            "Cannot compare images of different sizes: {}x{} vs {}x{}",
            image_a.width,
            image_a.height,
            image_b.width,
            image_b.height
        );
    }

    let pixels_a = image_a.to_rgb8();
    let pixels_b = image_b.to_rgb8();
    let ssim = calculate_ssim(&pixels_a, &pixels_b, image_a.width, image_a.height, 3);
    let diff = abs_diff(&pixels_a, &pixels_b, 3)
        .ok_or_else(|| anyhow::anyhow!("pixel buffers differ in length"))?;

    Ok(CompareResult {
        file_a: path_a.to_string(),
        file_b: path_b.to_string(),
        identical: data_a == data_b,
        hash_a,
        hash_b,
        width: image_a.width,
        height: image_a.height,
        ssim,
        mean_abs_diff: diff.mean,
        max_abs_diff: diff.max,
        differing_pixels: diff.differing_pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use normprobe_core::png::write_rgb;
    use normprobe_core::{Color, FrameBuffer, PngConfig};
    use std::path::Path;

    fn write(dir: &Path, name: &str, frame: &FrameBuffer) -> String {
        let path = dir.join(name);
        write_rgb(frame, &path, &PngConfig::default()).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let frame = FrameBuffer::new(16, 16, Color::gray(0.4));
        let a = write(dir.path(), "a.png", &frame);
        let b = write(dir.path(), "b.png", &frame);
        let result = compare(&a, &b).unwrap();
        assert!(result.identical);
        assert_eq!(result.ssim, 1.0);
        assert_eq!(result.max_abs_diff, 0);
    }

    #[test]
    fn test_single_pixel_difference() {
        let dir = tempfile::tempdir().unwrap();
        let frame = FrameBuffer::new(16, 16, Color::gray(0.4));
        let mut other = frame.clone();
        other.set(3, 5, Color::rgb(1.0, 0.4, 0.4));
        let a = write(dir.path(), "a.png", &frame);
        let b = write(dir.path(), "b.png", &other);
        let result = compare(&a, &b).unwrap();
        assert!(!result.identical);
        assert_eq!(result.differing_pixels, 1);
        assert!(result.max_abs_diff > 100);
        assert!(result.ssim < 1.0);
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.png", &FrameBuffer::new_black(8, 8));
        let b = write(dir.path(), "b.png", &FrameBuffer::new_black(8, 9));
        assert!(compare(&a, &b).is_err());
    }
}
