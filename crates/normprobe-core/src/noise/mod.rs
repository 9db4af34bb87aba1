//! Per-pixel noise sources for dithering.
//!
//! Every source is a pure function of the integer pixel coordinate: the same
//! pixel yields the same sample on every frame, so captures are reproducible.

mod blue;
mod ign;

pub use blue::BlueNoiseTile;
pub use ign::InterleavedGradient;

use normprobe_spec::{FrameParams, NoiseMode};
use thiserror::Error;

use crate::png::PngError;
use crate::rng::DeterministicRng;

/// Pixel offsets of the decorrelated taps, one per lattice channel.
pub const TAP_OFFSETS: [[u32; 2]; 2] = [[0, 0], [17, 29]];

/// Largest `f64` strictly below 1, used to keep samples in [0, 1).
pub(crate) const BELOW_ONE: f64 = 1.0 - f64::EPSILON;

/// Errors that can occur while preparing a noise source.
#[derive(Debug, Error)]
pub enum NoiseError {
    #[error("Failed to load blue-noise tile: {0}")]
    Png(#[from] PngError),

    #[error("Blue-noise tile is empty")]
    EmptyTile,

    #[error("Blue-noise tile size must be at least 2, got {0}")]
    TileTooSmall(u32),
}

/// Trait for per-pixel scalar noise in [0, 1).
pub trait NoiseSource {
    /// Sample the noise at an integer pixel coordinate.
    fn sample(&self, x: u32, y: u32) -> f64;

    /// Decorrelated samples taken at [`TAP_OFFSETS`].
    fn taps(&self, x: u32, y: u32) -> [f64; 2] {
        TAP_OFFSETS.map(|[dx, dy]| self.sample(x.wrapping_add(dx), y.wrapping_add(dy)))
    }
}

/// Runtime-selected noise source.
#[derive(Debug, Clone)]
pub enum NoiseField {
    Blue(BlueNoiseTile),
    Ign(InterleavedGradient),
}

impl NoiseField {
    /// Build the source selected by a parameter snapshot.
    ///
    /// Blue noise is loaded from `blue_noise_path` when set, otherwise
    /// generated from `noise_seed` at `noise_tile_size`.
    pub fn from_params(params: &FrameParams) -> Result<Self, NoiseError> {
        match params.noise {
            NoiseMode::Ign => Ok(NoiseField::Ign(InterleavedGradient)),
            NoiseMode::BlueNoise => {
                let tile = match &params.blue_noise_path {
                    Some(path) => BlueNoiseTile::from_png_file(std::path::Path::new(path))?,
                    None => {
                        let seed = DeterministicRng::derive_seed(params.noise_seed, "blue-noise");
                        BlueNoiseTile::generate(params.noise_tile_size, seed)?
                    }
                };
                Ok(NoiseField::Blue(tile))
            }
        }
    }

    /// Mode this field implements.
    pub fn mode(&self) -> NoiseMode {
        match self {
            NoiseField::Blue(_) => NoiseMode::BlueNoise,
            NoiseField::Ign(_) => NoiseMode::Ign,
        }
    }
}

impl NoiseSource for NoiseField {
    fn sample(&self, x: u32, y: u32) -> f64 {
        match self {
            NoiseField::Blue(tile) => tile.sample(x, y),
            NoiseField::Ign(ign) => ign.sample(x, y),
        }
    }
}

/// Fractional part, always in [0, 1).
#[inline]
pub(crate) fn fract(x: f64) -> f64 {
    (x - x.floor()).min(BELOW_ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fract() {
        assert_eq!(fract(1.25), 0.25);
        assert_eq!(fract(-0.25), 0.75);
        assert_eq!(fract(3.0), 0.0);
    }

    #[test]
    fn test_taps_are_decorrelated() {
        let ign = InterleavedGradient;
        let t = ign.taps(10, 20);
        assert_eq!(t[0], ign.sample(10, 20));
        assert_eq!(t[1], ign.sample(27, 49));
        assert_ne!(t[0], t[1]);
    }

    #[test]
    fn test_from_params_selects_mode() {
        let params = FrameParams::builder().noise(NoiseMode::Ign).build();
        let field = NoiseField::from_params(&params).unwrap();
        assert_eq!(field.mode(), NoiseMode::Ign);

        let params = FrameParams::builder()
            .noise(NoiseMode::BlueNoise)
            .noise_tile(3, 16)
            .build();
        let field = NoiseField::from_params(&params).unwrap();
        assert_eq!(field.mode(), NoiseMode::BlueNoise);
    }

    #[test]
    fn test_missing_blue_noise_file_is_error() {
        let params = FrameParams::builder()
            .blue_noise_path("/nonexistent/normprobe/tile.png")
            .build();
        assert!(matches!(
            NoiseField::from_params(&params),
            Err(NoiseError::Png(_))
        ));
    }
}
