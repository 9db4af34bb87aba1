//! Export command implementation
//!
//! Renders the display frame, locates the specular highlight and writes a
//! highlight-centred crop (or the whole frame) under a filename that encodes
//! every parameter.

use anyhow::{Context, Result};
use colored::Colorize;
use normprobe_core::{CaptureExporter, FrameRenderer, NoiseField};
use normprobe_spec::canonical_params_hash;
use std::path::Path;
use std::process::ExitCode;

use super::emit_json;
use super::json_output::{error_codes, ExportResult};
use crate::input::ParamsArgs;

/// Run the export command
///
/// # Arguments
/// * `args` - Params file and overrides
/// * `out_dir` - Directory the capture is written into
/// * `full_frame` - Skip the highlight crop
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(
    args: &ParamsArgs,
    out_dir: &str,
    full_frame: bool,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        emit_json(export(args, Path::new(out_dir), full_frame), error_codes::WRITE)
    } else {
        run_human(args, out_dir, full_frame)
    }
}

fn run_human(args: &ParamsArgs, out_dir: &str, full_frame: bool) -> Result<ExitCode> {
    println!("{} {}", "Exporting to:".cyan().bold(), out_dir);
    let result = export(args, Path::new(out_dir), full_frame)?;

    match (result.crop, result.center) {
        (Some(size), Some([x, y])) => println!(
            "{} {}px around ({:.1}, {:.1})",
            "Crop:".dimmed(),
            size,
            x,
            y
        ),
        _ => println!("{} full frame", "Crop:".dimmed()),
    }
    println!("{} {}x{}", "Size:".dimmed(), result.width, result.height);
    println!("{} {}", "Hash:".dimmed(), &result.hash[..16]);
    println!("\n{} {}", "Wrote".green().bold(), result.path);
    Ok(ExitCode::SUCCESS)
}

/// Render and export one capture; shared by both output modes.
///
/// The PNG encode runs on the exporter's worker thread while this thread
/// waits for it.
pub fn export(args: &ParamsArgs, out_dir: &Path, full_frame: bool) -> Result<ExportResult> {
    let params = args.load()?;
    let noise = NoiseField::from_params(&params).context("Failed to build noise source")?;
    let renderer = FrameRenderer::from_params(&params);
    let frame = renderer.render(&params, &noise);

    let exporter = CaptureExporter::new(out_dir);
    let image = if full_frame {
        exporter.capture_full(&frame.display, &params)
    } else {
        exporter.capture(&frame.display, &params, &renderer.camera)
    };
    let region = image.region;

    let output = exporter
        .spawn_write(image)
        .and_then(|handle| handle.wait())
        .with_context(|| format!("Failed to export capture into {}", out_dir.display()))?;

    Ok(ExportResult {
        path: output.path.display().to_string(),
        hash: output.hash,
        params_hash: canonical_params_hash(&params)?,
        width: output.width,
        height: output.height,
        crop: region.map(|r| r.size),
        center: region.map(|r| [r.center_x, r.center_y]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InvalidParams;
    use normprobe_spec::{EncodingMode, NoiseMode};

    fn args() -> ParamsArgs {
        ParamsArgs {
            encoding: Some(EncodingMode::Cartesian),
            noise: Some(NoiseMode::Ign),
            bits: Some(5.0),
            roughness: Some(0.1),
            width: Some(120),
            height: Some(90),
            ..Default::default()
        }
    }

    #[test]
    fn test_crop_export_is_square_and_named() {
        let dir = tempfile::tempdir().unwrap();
        let result = export(&args(), dir.path(), false).unwrap();
        // 256 + 0.1 * 1500 exceeds the frame, so the crop is the short side.
        assert_eq!(result.crop, Some(90));
        assert_eq!((result.width, result.height), (90, 90));
        assert!(result.path.ends_with("_c90.png"), "{}", result.path);
        assert!(Path::new(&result.path).exists());
    }

    #[test]
    fn test_full_frame_export() {
        let dir = tempfile::tempdir().unwrap();
        let result = export(&args(), dir.path(), true).unwrap();
        assert_eq!(result.crop, None);
        assert_eq!((result.width, result.height), (120, 90));
        assert!(result.path.ends_with("_full.png"), "{}", result.path);
    }

    #[test]
    fn test_repeat_export_overwrites_with_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let first = export(&args(), dir.path(), false).unwrap();
        let second = export(&args(), dir.path(), false).unwrap();
        assert_eq!(first.path, second.path);
        assert_eq!(first.hash, second.hash);
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_rejected_params_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let bad = ParamsArgs {
            roughness: Some(5.0),
            bits: Some(40.0),
            amplitude: Some(9.0),
            width: Some(0),
            ..args()
        };
        let err = export(&bad, dir.path(), false).unwrap_err();
        let invalid = err.downcast_ref::<InvalidParams>().unwrap();
        assert_eq!(invalid.errors.len(), 4);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
