//! Pick command implementation
//!
//! Presses the pointer at a pixel and reports the light the controller
//! mirrors onto the picked surface point.

use anyhow::{Context, Result};
use colored::Colorize;
use normprobe_core::{LightController, PerspectiveCamera, UnitSphere};
use std::path::Path;
use std::process::ExitCode;

use super::emit_json;
use super::json_output::{error_codes, PickResult};
use crate::input::ParamsArgs;

/// Run the pick command
///
/// # Arguments
/// * `args` - Params file and overrides
/// * `x`, `y` - Pointer position in pixels, top-left origin
/// * `save` - Write the updated params here
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(
    args: &ParamsArgs,
    x: f64,
    y: f64,
    save: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        emit_json(pick(args, x, y, save), error_codes::FILE_READ)
    } else {
        run_human(args, x, y, save)
    }
}

fn run_human(args: &ParamsArgs, x: f64, y: f64, save: Option<&str>) -> Result<ExitCode> {
    println!("{} ({}, {})", "Picking at:".cyan().bold(), x, y);
    let result = pick(args, x, y, save)?;

    if !result.hit {
        println!("  {} pointer missed the sphere, light unchanged", "!".yellow());
    }
    println!("{} {:+.2} deg", "Azimuth:".dimmed(), result.azimuth_degrees);
    println!("{} {:+.2} deg", "Elevation:".dimmed(), result.elevation_degrees);
    let [dx, dy, dz] = result.direction;
    println!("{} ({:.4}, {:.4}, {:.4})", "Direction:".dimmed(), dx, dy, dz);
    if let Some(path) = &result.saved {
        println!("\n{} {}", "Saved".green().bold(), path);
    }
    Ok(ExitCode::SUCCESS)
}

/// One pointer press and release; shared by both output modes.
pub fn pick(args: &ParamsArgs, x: f64, y: f64, save: Option<&str>) -> Result<PickResult> {
    let params = args.load()?;
    let camera = PerspectiveCamera::from_params(&params);
    let sphere = UnitSphere::default();

    let mut controller = LightController::from_params(&params);
    let hit = controller.pointer_down(&sphere, &camera.ray_through(x, y), camera.position);
    controller.pointer_up();
    log::debug!("pick at ({}, {}): hit = {}", x, y, hit);

    let saved = match save {
        Some(path) => {
            controller
                .apply_to(&params)
                .save(Path::new(path))
                .with_context(|| format!("Failed to save params: {}", path))?;
            Some(path.to_string())
        }
        None => None,
    };

    let direction = controller.direction();
    Ok(PickResult {
        x,
        y,
        hit,
        azimuth_degrees: controller.azimuth().to_degrees(),
        elevation_degrees: controller.elevation().to_degrees(),
        direction: [direction.x, direction.y, direction.z],
        saved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use normprobe_spec::FrameParams;

    fn square() -> ParamsArgs {
        ParamsArgs {
            width: Some(100),
            height: Some(100),
            azimuth: Some(30.0),
            elevation: Some(10.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_pick_centre_points_light_at_camera() {
        let result = pick(&square(), 50.0, 50.0, None).unwrap();
        assert!(result.hit);
        assert!(result.azimuth_degrees.abs() < 1e-6);
        assert!(result.elevation_degrees.abs() < 1e-6);
    }

    #[test]
    fn test_pick_miss_keeps_light() {
        let result = pick(&square(), 0.0, 0.0, None).unwrap();
        assert!(!result.hit);
        assert!((result.azimuth_degrees - 30.0).abs() < 1e-9);
        assert!((result.elevation_degrees - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_pick_above_centre_raises_light() {
        let result = pick(&square(), 50.0, 40.0, None).unwrap();
        assert!(result.hit);
        assert!(result.elevation_degrees > 0.0);
    }

    #[test]
    fn test_pick_saves_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picked.json");
        let result = pick(&square(), 60.0, 50.0, Some(path.to_str().unwrap())).unwrap();
        let saved = FrameParams::from_file(&path).unwrap();
        assert!((saved.light_azimuth.to_degrees() - result.azimuth_degrees).abs() < 1e-9);
        assert_eq!(saved.resolution, [100, 100]);
    }
}
