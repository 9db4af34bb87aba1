//! Interleaved gradient noise (Jimenez 2014).

use super::{fract, NoiseSource};

const MAGIC_X: f64 = 0.06711056;
const MAGIC_Y: f64 = 0.00583715;
const MAGIC_Z: f64 = 52.9829189;

/// Closed-form per-pixel noise with no texture dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterleavedGradient;

impl NoiseSource for InterleavedGradient {
    #[inline]
    fn sample(&self, x: u32, y: u32) -> f64 {
        fract(MAGIC_Z * fract(MAGIC_X * x as f64 + MAGIC_Y * y as f64))
    }
}
