//! Offline codec analysis: distortion surveys and reconstruction error.

use glam::{DVec2, DVec3};

use crate::buffer::FrameBuffer;
use crate::codec::{NormalCodec, Quantizer, Rounding};
use crate::color::Color;
use crate::rng::DeterministicRng;

/// Distance kept from the lattice border, in signed [-1, 1] coordinates.
pub const SURVEY_INSET: f64 = 1e-4;

/// Lattice points whose decode does not re-encode to within this distance
/// lie outside the codec's domain.
const DOMAIN_TOLERANCE: f64 = 1e-9;

/// Distortion statistics over a regular lattice grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DistortionSurvey {
    pub resolution: u32,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// `max / min`; 1 means perfectly uniform.
    pub ratio: f64,
    /// Number of grid points inside the codec's domain.
    pub samples: usize,
    /// Row-major distortion per grid point, `None` outside the domain.
    pub field: Vec<Option<f64>>,
}

impl DistortionSurvey {
    /// Grayscale image of the field, normalized to [min, max].
    ///
    /// Points outside the domain are black.
    pub fn to_image(&self) -> FrameBuffer {
        let span = (self.max - self.min).max(f64::MIN_POSITIVE);
        FrameBuffer {
            width: self.resolution,
            height: self.resolution,
            data: self
                .field
                .iter()
                .map(|v| match v {
                    Some(j) => Color::gray(((j - self.min) / span).clamp(0.0, 1.0)),
                    None => Color::black(),
                })
                .collect(),
        }
    }
}

/// Evaluate a codec's distortion over a `resolution²` grid.
///
/// The grid spans the lattice inset by [`SURVEY_INSET`]. Only points that are
/// the image of some front-hemisphere normal are counted; for the Cartesian
/// codec that excludes the corners outside the unit disc.
pub fn distortion_survey<C: NormalCodec + ?Sized>(codec: &C, resolution: u32) -> DistortionSurvey {
    let resolution = resolution.max(2);
    let lo = -1.0 + SURVEY_INSET;
    let step = 2.0 * (1.0 - SURVEY_INSET) / (resolution - 1) as f64;

    let mut field = Vec::with_capacity(resolution as usize * resolution as usize);
    let (mut min, mut max, mut sum, mut samples) = (f64::INFINITY, 0.0f64, 0.0, 0usize);

    for row in 0..resolution {
        for col in 0..resolution {
            let s = DVec2::new(lo + col as f64 * step, lo + row as f64 * step);
            let q = s * 0.5 + 0.5;
            let n = codec.from_lattice(q);
            if n.z < 0.0 || (codec.to_lattice(n) - q).length() > DOMAIN_TOLERANCE {
                field.push(None);
                continue;
            }
            let j = codec.distortion(q);
            min = min.min(j);
            max = max.max(j);
            sum += j;
            samples += 1;
            field.push(Some(j));
        }
    }

    if samples == 0 {
        min = 0.0;
    }
    let ratio = if min > 0.0 { max / min } else { f64::INFINITY };
    DistortionSurvey {
        resolution,
        min,
        max,
        mean: if samples > 0 { sum / samples as f64 } else { 0.0 },
        ratio,
        samples,
        field,
    }
}

/// Angular reconstruction error over a hemisphere sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionError {
    pub bits: f64,
    pub samples: usize,
    pub mean_degrees: f64,
    pub max_degrees: f64,
}

/// Angle between two vectors in degrees, stable near zero.
pub fn angle_degrees(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b)).to_degrees()
}

/// Mean and max angle between `n` and `decode(encode(n))` over `samples`
/// uniformly distributed front-hemisphere normals.
pub fn reconstruction_error<C: NormalCodec + ?Sized>(
    codec: &C,
    rounding: Rounding,
    bits: f64,
    samples: usize,
    seed: u32,
) -> ReconstructionError {
    let quantizer = Quantizer::new(bits, rounding);
    let mut rng = DeterministicRng::new(DeterministicRng::derive_seed(seed, "hemisphere-survey"));
    let (mut sum, mut max) = (0.0, 0.0f64);
    for _ in 0..samples {
        let n = rng.unit_hemisphere();
        let err = angle_degrees(n, codec.round_trip(n, &quantizer));
        sum += err;
        max = max.max(err);
    }
    ReconstructionError {
        bits,
        samples,
        mean_degrees: if samples > 0 { sum / samples as f64 } else { 0.0 },
        max_degrees: max,
    }
}
