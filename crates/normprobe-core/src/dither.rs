//! Lattice dithering.
//!
//! Dither is applied to the unquantized lattice coordinate, one noise tap per
//! channel, scaled by one lattice step times the user amplitude. Adaptive
//! (AJWD) mode further weights the step by the codec's local distortion so
//! that regions where the decode map stretches solid angle get proportionally
//! less parameter-space dither, and compressed regions get more.

use glam::{DVec2, DVec3};
use normprobe_spec::{DitherMode, Distribution, FrameParams};

use crate::codec::{NormalCodec, Quantizer};
use crate::noise::NoiseSource;

/// Jacobian floor before the inverse square root.
pub const JACOBIAN_FLOOR: f64 = 0.05;

/// Upper bound on the adaptive amplification factor.
pub const AMPLIFICATION_CAP: f64 = 2.5;

/// Recentre a uniform sample in [0, 1) according to a distribution.
///
/// Rectangular yields [-0.5, 0.5). Triangular applies the one-sample
/// triangular remap and yields (-1, 1) with a tent-shaped density.
#[inline]
pub fn shape_sample(u: f64, distribution: Distribution) -> f64 {
    match distribution {
        Distribution::Rectangular => u - 0.5,
        Distribution::Triangular => {
            let orig = u * 2.0 - 1.0;
            if orig == 0.0 {
                return 0.0;
            }
            let n = orig / orig.abs().sqrt();
            n.max(-1.0) - orig.signum()
        }
    }
}

/// AJWD weight `min(1 / sqrt(max(J, floor)), cap)`.
#[inline]
pub fn ajwd_weight(jacobian: f64) -> f64 {
    (1.0 / jacobian.max(JACOBIAN_FLOOR).sqrt()).min(AMPLIFICATION_CAP)
}

/// Dither settings taken from one frame's parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherEngine {
    pub mode: DitherMode,
    pub distribution: Distribution,
    pub amplitude: f64,
}

impl Default for DitherEngine {
    fn default() -> Self {
        Self {
            mode: DitherMode::None,
            distribution: Distribution::Rectangular,
            amplitude: 1.0,
        }
    }
}

impl DitherEngine {
    /// Create an engine.
    pub fn new(mode: DitherMode, distribution: Distribution, amplitude: f64) -> Self {
        Self {
            mode,
            distribution,
            amplitude,
        }
    }

    /// Engine configured from a parameter snapshot.
    pub fn from_params(params: &FrameParams) -> Self {
        Self::new(params.dither, params.distribution, params.noise_amplitude)
    }

    /// Amplitude weight at a lattice coordinate, before the step size.
    pub fn weight<C: NormalCodec + ?Sized>(&self, codec: &C, lattice: DVec2) -> f64 {
        match self.mode {
            DitherMode::None => 0.0,
            DitherMode::Uniform => 1.0,
            DitherMode::Adaptive => ajwd_weight(codec.distortion(lattice)),
        }
    }

    /// Dither offset for a coordinate given pre-fetched noise taps.
    pub fn offset<C: NormalCodec + ?Sized>(
        &self,
        codec: &C,
        lattice: DVec2,
        quantizer: &Quantizer,
        [u, v]: [f64; 2],
    ) -> DVec2 {
        let scale = quantizer.step() * self.amplitude * self.weight(codec, lattice);
        DVec2::new(
            shape_sample(u, self.distribution),
            shape_sample(v, self.distribution),
        ) * scale
    }

    /// Perturb an unquantized lattice coordinate, clamped to [0, 1]².
    pub fn perturb<C: NormalCodec + ?Sized, N: NoiseSource + ?Sized>(
        &self,
        codec: &C,
        lattice: DVec2,
        quantizer: &Quantizer,
        noise: &N,
        pixel: [u32; 2],
    ) -> DVec2 {
        if !self.mode.is_enabled() {
            return lattice;
        }
        let taps = noise.taps(pixel[0], pixel[1]);
        let offset = self.offset(codec, lattice, quantizer, taps);
        (lattice + offset).clamp(DVec2::ZERO, DVec2::ONE)
    }

    /// Encode, dither, quantize and decode a normal for one pixel.
    pub fn encode<C: NormalCodec + ?Sized, N: NoiseSource + ?Sized>(
        &self,
        codec: &C,
        normal: DVec3,
        quantizer: &Quantizer,
        noise: &N,
        pixel: [u32; 2],
    ) -> DVec3 {
        let lattice = codec.to_lattice(normal);
        let perturbed = self.perturb(codec, lattice, quantizer, noise, pixel);
        codec.from_lattice(quantizer.quantize(perturbed))
    }
}
