//! Distortion command implementation
//!
//! Surveys a codec's area distortion over its lattice and optionally writes
//! the field as a heatmap PNG.

use anyhow::{Context, Result};
use colored::Colorize;
use normprobe_core::png::write_rgb;
use normprobe_core::{distortion_survey, Codec, ErrorAnalyzer, PngConfig};
use normprobe_spec::EncodingMode;
use std::path::Path;
use std::process::ExitCode;

use super::emit_json;
use super::json_output::{error_codes, DistortionResult};

/// Run the distortion command
///
/// # Arguments
/// * `encoding` - Codec to survey
/// * `resolution` - Grid points per side
/// * `output` - Optional heatmap PNG path
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(
    encoding: EncodingMode,
    resolution: u32,
    output: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        return emit_json(survey(encoding, resolution, output), error_codes::UNSUPPORTED_CODEC);
    }

    println!(
        "{} {} at {}x{}",
        "Distortion survey:".cyan().bold(),
        encoding.as_str(),
        resolution,
        resolution
    );
    let result = survey(encoding, resolution, output)?;
    println!("{} {}", "Samples:".dimmed(), result.samples);
    println!("{} {:.6}", "Min:".dimmed(), result.min);
    println!("{} {:.6}", "Max:".dimmed(), result.max);
    println!("{} {:.6}", "Mean:".dimmed(), result.mean);
    println!("{} {:.3}", "Max/min:".dimmed(), result.ratio);
    if let Some(path) = &result.output {
        println!("\n{} {}", "Wrote".green().bold(), path);
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the survey and write the heatmap; shared by both output modes.
pub fn survey(
    encoding: EncodingMode,
    resolution: u32,
    output: Option<&str>,
) -> Result<DistortionResult> {
    let (codec, _) = Codec::for_mode(encoding).ok_or_else(|| {
        anyhow::anyhow!(
            "{} has no lattice to survey (choose cartesian or hemi-oct)",
            encoding.as_str()
        )
    })?;
    let survey = distortion_survey(&codec, resolution);

    if let Some(path) = output {
        // Normalized field, square-root ramp without extra gain.
        let analyzer = ErrorAnalyzer {
            heatmap_gain: 1.0,
            ..ErrorAnalyzer::default()
        };
        let image = analyzer.heatmap_frame(&survey.to_image());
        write_rgb(&image, Path::new(path), &PngConfig::default())
            .with_context(|| format!("Failed to write {}", path))?;
    }

    Ok(DistortionResult {
        encoding: encoding.as_str().to_string(),
        resolution: survey.resolution,
        samples: survey.samples,
        min: survey.min,
        max: survey.max,
        mean: survey.mean,
        ratio: survey.ratio,
        output: output.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_truth_is_rejected() {
        assert!(survey(EncodingMode::GroundTruth, 16, None).is_err());
    }

    #[test]
    fn test_hemi_oct_more_uniform() {
        let ho = survey(EncodingMode::HemiOct, 33, None).unwrap();
        let cart = survey(EncodingMode::Cartesian, 33, None).unwrap();
        assert!(ho.ratio < cart.ratio);
        assert!(ho.samples > cart.samples);
    }

    #[test]
    fn test_writes_heatmap_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.png");
        let result = survey(EncodingMode::HemiOct, 24, Some(path.to_str().unwrap())).unwrap();
        assert_eq!(result.resolution, 24);
        let image = normprobe_core::png::read_rgb_file(&path).unwrap();
        assert_eq!((image.width, image.height), (24, 24));
    }
}
