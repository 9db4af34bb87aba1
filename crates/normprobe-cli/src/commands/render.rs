//! Render command implementation
//!
//! Renders one frame of the probe sphere and writes the selected view to PNG.

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use normprobe_core::png::write_rgb_to_vec_with_hash;
use normprobe_core::{FrameRenderer, NoiseField, PngConfig, RenderedFrame};
use normprobe_spec::{canonical_params_hash, FrameParams, Visualization};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::emit_json;
use super::json_output::{error_codes, RenderResult};
use crate::input::ParamsArgs;

/// Which buffer of the rendered frame is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderView {
    /// Whatever the params' visualization selects
    Display,
    /// Full-precision specular response
    GroundTruth,
    /// Response of the encoded normal
    Candidate,
    /// Curved error heatmap
    Heatmap,
    /// Linear error, amplified
    Linear,
}

impl RenderView {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderView::Display => "display",
            RenderView::GroundTruth => "ground-truth",
            RenderView::Candidate => "candidate",
            RenderView::Heatmap => "heatmap",
            RenderView::Linear => "linear",
        }
    }

    /// Visualization the frame must be rendered with for this view.
    fn visualization(&self, params: &FrameParams) -> Visualization {
        match self {
            RenderView::Heatmap => Visualization::DifferenceHeatmap,
            RenderView::Linear => Visualization::LinearDifference,
            _ => params.visualization,
        }
    }

    fn select(self, frame: RenderedFrame) -> normprobe_core::FrameBuffer {
        match self {
            RenderView::GroundTruth => frame.ground_truth,
            RenderView::Candidate => frame.candidate,
            RenderView::Display | RenderView::Heatmap | RenderView::Linear => frame.display,
        }
    }
}

/// Run the render command
///
/// # Arguments
/// * `args` - Params file and overrides
/// * `view` - Which buffer to write
/// * `output` - Output PNG path
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(
    args: &ParamsArgs,
    view: RenderView,
    output: &str,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        emit_json(render_to_file(args, view, output), error_codes::RENDER)
    } else {
        run_human(args, view, output)
    }
}

fn run_human(args: &ParamsArgs, view: RenderView, output: &str) -> Result<ExitCode> {
    println!("{} {} view", "Rendering:".cyan().bold(), view.as_str());
    let result = render_to_file(args, view, output)?;

    println!("{} {}x{}", "Size:".dimmed(), result.width, result.height);
    println!(
        "{} {} covered, {} differing",
        "Pixels:".dimmed(),
        result.stats.covered_pixels,
        result.stats.differing_pixels
    );
    println!(
        "{} mean {:.6}, max {:.6}",
        "Error:".dimmed(),
        result.stats.mean_error,
        result.stats.max_error
    );
    println!("{} {}", "Hash:".dimmed(), &result.hash[..16]);
    println!("\n{} {}", "Wrote".green().bold(), result.output);
    Ok(ExitCode::SUCCESS)
}

/// Render, encode and write; shared by both output modes.
pub fn render_to_file(args: &ParamsArgs, view: RenderView, output: &str) -> Result<RenderResult> {
    let mut params = args.load()?;
    params.visualization = view.visualization(&params);

    let noise = NoiseField::from_params(&params).context("Failed to build noise source")?;
    let frame = FrameRenderer::from_params(&params).render(&params, &noise);
    let stats = frame.stats;
    let buffer = view.select(frame);

    let (bytes, hash) = write_rgb_to_vec_with_hash(&buffer, &PngConfig::default())
        .context("Failed to encode PNG")?;
    let path = Path::new(output);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", output))?;
    log::info!("rendered {} view to {}", view.as_str(), output);

    Ok(RenderResult {
        output: output.to_string(),
        view: view.as_str().to_string(),
        width: buffer.width,
        height: buffer.height,
        hash,
        params_hash: canonical_params_hash(&params)?,
        stats: stats.into(),
    })
}
