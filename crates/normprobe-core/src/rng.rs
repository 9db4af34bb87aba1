//! Seeded PCG32 source for blue-noise tiles and error surveys.
//!
//! Blue-noise generation and hemisphere sampling both go through this type so
//! every tile and every error survey is reproducible from its seed.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[derive(Clone)]
pub struct DeterministicRng {
    inner: Pcg32,
}

impl DeterministicRng {
    /// The 32-bit seed is mirrored into both halves of the PCG state seed.
    pub fn new(seed: u32) -> Self {
        let wide = u64::from(seed) * 0x1_0000_0001;
        Self {
            inner: Pcg32::seed_from_u64(wide),
        }
    }

    /// Independent seed for a named stream, taken from a BLAKE3 digest.
    pub fn derive_seed(base_seed: u32, purpose: &str) -> u32 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&base_seed.to_le_bytes());
        hasher.update(purpose.as_bytes());
        let digest = hasher.finalize();
        let mut word = [0u8; 4];
        word.copy_from_slice(&digest.as_bytes()[..4]);
        u32::from_le_bytes(word)
    }

    /// Uniform in [0, 1).
    #[inline]
    pub fn gen_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    #[inline]
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Uniformly distributed unit vector on the hemisphere `z >= 0`.
    pub fn unit_hemisphere(&mut self) -> DVec3 {
        // Archimedes: z uniform on [0, 1] gives uniform area.
        let z = self.gen_f64();
        let phi = self.gen_f64() * std::f64::consts::TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        DVec3::new(r * phi.cos(), r * phi.sin(), z)
    }
}
