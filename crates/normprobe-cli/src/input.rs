//! Params file loading with command-line overrides.

use anyhow::{Context, Result};
use clap::Args;
use normprobe_spec::{
    validate_params, DitherMode, Distribution, EncodingMode, FrameParams, NoiseMode,
    ValidationError, Visualization,
};
use std::path::Path;
use thiserror::Error;

/// The merged snapshot failed validation; nothing was rendered.
#[derive(Debug, Error)]
#[error("params failed validation with {} error(s): {}", .errors.len(), list(.errors))]
pub struct InvalidParams {
    pub errors: Vec<ValidationError>,
}

fn list(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Frame parameters shared by the rendering commands.
///
/// Every flag overrides the matching field of the params file; without a
/// file the defaults apply.
#[derive(Debug, Clone, Default, Args)]
pub struct ParamsArgs {
    /// Params file (JSON) to start from
    #[arg(short, long)]
    pub params: Option<String>,

    /// Normal encoding (ground-truth, cartesian, hemi-oct, cartesian-floor)
    #[arg(short, long)]
    pub encoding: Option<EncodingMode>,

    /// Dither mode (none, uniform, adaptive)
    #[arg(short, long)]
    pub dither: Option<DitherMode>,

    /// Noise source (blue-noise, ign)
    #[arg(long)]
    pub noise: Option<NoiseMode>,

    /// Dither distribution (rectangular, triangular)
    #[arg(long)]
    pub distribution: Option<Distribution>,

    /// Bits per lattice channel
    #[arg(short, long)]
    pub bits: Option<f64>,

    /// Specular roughness
    #[arg(short, long)]
    pub roughness: Option<f64>,

    /// Light azimuth in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub azimuth: Option<f64>,

    /// Light elevation in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub elevation: Option<f64>,

    /// Dither amplitude in quantization steps
    #[arg(long)]
    pub amplitude: Option<f64>,

    /// Visualization (standard, linear, heatmap)
    #[arg(long)]
    pub visualization: Option<Visualization>,

    /// Frame width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Noise seed for the generated blue-noise tile
    #[arg(long)]
    pub seed: Option<u32>,

    /// Grayscale blue-noise PNG to use instead of generating a tile
    #[arg(long)]
    pub blue_noise: Option<String>,
}

impl ParamsArgs {
    /// Load the params file (if any), apply the overrides and validate.
    ///
    /// Fails with [`InvalidParams`] when the merged snapshot has errors;
    /// warnings are logged.
    pub fn load(&self) -> Result<FrameParams> {
        let base = match &self.params {
            Some(path) => FrameParams::from_file(Path::new(path))
                .with_context(|| format!("Failed to load params file: {}", path))?,
            None => FrameParams::default(),
        };
        let params = self.apply(base);

        let validation = validate_params(&params);
        for warning in &validation.warnings {
            log::warn!("{}", warning);
        }
        match validation.into_result() {
            Ok(_) => Ok(params),
            Err(errors) => Err(InvalidParams { errors }.into()),
        }
    }

    /// Apply the overrides to an existing snapshot.
    pub fn apply(&self, mut params: FrameParams) -> FrameParams {
        if let Some(encoding) = self.encoding {
            params.encoding = encoding;
        }
        if let Some(dither) = self.dither {
            params.dither = dither;
        }
        if let Some(noise) = self.noise {
            params.noise = noise;
        }
        if let Some(distribution) = self.distribution {
            params.distribution = distribution;
        }
        if let Some(bits) = self.bits {
            params.bit_depth = bits;
        }
        if let Some(roughness) = self.roughness {
            params.roughness = roughness;
        }
        if let Some(amplitude) = self.amplitude {
            params.noise_amplitude = amplitude;
        }
        if let Some(visualization) = self.visualization {
            params.visualization = visualization;
        }
        if let Some(width) = self.width {
            params.resolution[0] = width;
        }
        if let Some(height) = self.height {
            params.resolution[1] = height;
        }
        if let Some(seed) = self.seed {
            params.noise_seed = seed;
        }
        if let Some(path) = &self.blue_noise {
            params.blue_noise_path = Some(path.clone());
        }
        if self.azimuth.is_some() || self.elevation.is_some() {
            let azimuth = self
                .azimuth
                .map(f64::to_radians)
                .unwrap_or(params.light_azimuth);
            let elevation = self
                .elevation
                .map(f64::to_radians)
                .unwrap_or(params.light_elevation);
            params = params.with_light_angles(azimuth, elevation);
        }
        params
    }
}
