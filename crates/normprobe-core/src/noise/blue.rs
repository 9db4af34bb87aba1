//! Tileable blue-noise rank field.
//!
//! Tiles are generated with Ulichney's void-and-cluster method or loaded
//! from a grayscale PNG.

use std::path::Path;

use super::{NoiseError, NoiseSource, BELOW_ONE};
use crate::png::{read_grayscale_file, GrayImage};
use crate::rng::DeterministicRng;

/// Standard deviation of the toroidal Gaussian energy filter, in texels.
const ENERGY_SIGMA: f64 = 1.5;

/// Fraction of texels set in the initial binary pattern.
const INITIAL_DENSITY: f64 = 0.1;

/// Square, tileable field of values in [0, 1).
#[derive(Debug, Clone)]
pub struct BlueNoiseTile {
    size: u32,
    values: Vec<f64>,
}

/// Gaussian energy of a set of texels, on a torus.
struct EnergyField {
    size: usize,
    /// `exp(-d² / 2σ²)` for wrapped 1-D distance `d`.
    kernel: Vec<f64>,
    energy: Vec<f64>,
}

impl EnergyField {
    fn new(size: usize) -> Self {
        let kernel = (0..size)
            .map(|d| {
                let d = d.min(size - d) as f64;
                (-d * d / (2.0 * ENERGY_SIGMA * ENERGY_SIGMA)).exp()
            })
            .collect();
        Self {
            size,
            kernel,
            energy: vec![0.0; size * size],
        }
    }

    /// Add (`sign = 1`) or remove (`sign = -1`) a texel's contribution.
    fn splat(&mut self, index: usize, sign: f64) {
        let (px, py) = (index % self.size, index / self.size);
        for y in 0..self.size {
            let ky = self.kernel[(y + self.size - py) % self.size] * sign;
            let row = y * self.size;
            for x in 0..self.size {
                self.energy[row + x] += ky * self.kernel[(x + self.size - px) % self.size];
            }
        }
    }

    /// Highest-energy texel whose state equals `state`.
    fn tightest_cluster(&self, pattern: &[bool], state: bool) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, (&set, &e)) in pattern.iter().zip(&self.energy).enumerate() {
            if set == state && best.map_or(true, |(_, b)| e > b) {
                best = Some((i, e));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Lowest-energy texel whose state equals `state`.
    fn largest_void(&self, pattern: &[bool], state: bool) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, (&set, &e)) in pattern.iter().zip(&self.energy).enumerate() {
            if set == state && best.map_or(true, |(_, b)| e < b) {
                best = Some((i, e));
            }
        }
        best.map(|(i, _)| i)
    }
}

impl BlueNoiseTile {
    /// Generate a `size × size` tile.
    ///
    /// Cost is quadratic in the texel count; tiles beyond a few hundred texels
    /// on a side are better loaded from disk.
    pub fn generate(size: u32, seed: u32) -> Result<Self, NoiseError> {
        if size < 2 {
            return Err(NoiseError::TileTooSmall(size));
        }
        let side = size as usize;
        let n = side * side;
        let mut rng = DeterministicRng::new(seed);

        // Initial random binary pattern.
        let minority = ((n as f64 * INITIAL_DENSITY).round() as usize).clamp(1, n / 2);
        let mut pattern = vec![false; n];
        let mut placed = 0;
        while placed < minority {
            let i = rng.gen_index(n);
            if !pattern[i] {
                pattern[i] = true;
                placed += 1;
            }
        }

        let mut field = EnergyField::new(side);
        for (i, &set) in pattern.iter().enumerate() {
            if set {
                field.splat(i, 1.0);
            }
        }

        // Relax into the initial binary pattern: move the tightest cluster
        // into the largest void until that would be a no-op.
        for _ in 0..n * 4 {
            let Some(cluster) = field.tightest_cluster(&pattern, true) else {
                break;
            };
            pattern[cluster] = false;
            field.splat(cluster, -1.0);
            let Some(void) = field.largest_void(&pattern, false) else {
                break;
            };
            pattern[void] = true;
            field.splat(void, 1.0);
            if void == cluster {
                break;
            }
        }

        let mut ranks = vec![0usize; n];
        let prototype = pattern.clone();
        let prototype_energy = field.energy.clone();

        // Phase 1: peel the prototype's points off, densest first.
        for rank in (0..minority).rev() {
            let Some(cluster) = field.tightest_cluster(&pattern, true) else {
                break;
            };
            pattern[cluster] = false;
            field.splat(cluster, -1.0);
            ranks[cluster] = rank;
        }

        // Phase 2: fill voids until half the texels are set.
        pattern = prototype;
        field.energy = prototype_energy;
        let mut rank = minority;
        while rank < n / 2 {
            let Some(void) = field.largest_void(&pattern, false) else {
                break;
            };
            pattern[void] = true;
            field.splat(void, 1.0);
            ranks[void] = rank;
            rank += 1;
        }

        // Phase 3: zeros are now the minority; fill their tightest clusters.
        field.energy.iter_mut().for_each(|e| *e = 0.0);
        for (i, &set) in pattern.iter().enumerate() {
            if !set {
                field.splat(i, 1.0);
            }
        }
        while rank < n {
            let Some(cluster) = field.tightest_cluster(&pattern, false) else {
                break;
            };
            pattern[cluster] = true;
            field.splat(cluster, -1.0);
            ranks[cluster] = rank;
            rank += 1;
        }

        let values = ranks
            .into_iter()
            .map(|r| (r as f64 + 0.5) / n as f64)
            .collect();

        log::debug!("generated {}x{} blue-noise tile (seed {})", size, size, seed);
        Ok(Self { size, values })
    }

    /// Build a tile from a decoded grayscale image.
    ///
    /// A non-square image is cropped to its top-left square.
    pub fn from_gray(image: &GrayImage) -> Result<Self, NoiseError> {
        let size = image.width.min(image.height);
        if size == 0 || image.data.is_empty() {
            return Err(NoiseError::EmptyTile);
        }
        if image.width != image.height {
            log::warn!(
                "blue-noise image is {}x{}, using the top-left {}x{} square",
                image.width,
                image.height,
                size,
                size
            );
        }

        let width = image.width as usize;
        let mut values = Vec::with_capacity(size as usize * size as usize);
        for y in 0..size as usize {
            let row = &image.data[y * width..y * width + size as usize];
            values.extend(row.iter().map(|v| v.clamp(0.0, BELOW_ONE)));
        }
        Ok(Self { size, values })
    }

    /// Load a tile from a grayscale PNG file.
    pub fn from_png_file(path: &Path) -> Result<Self, NoiseError> {
        let image = read_grayscale_file(path)?;
        let tile = Self::from_gray(&image)?;
        log::debug!("loaded {}x{} blue-noise tile from {}", tile.size, tile.size, path.display());
        Ok(tile)
    }

    /// Tile period in texels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Raw values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl NoiseSource for BlueNoiseTile {
    #[inline]
    fn sample(&self, x: u32, y: u32) -> f64 {
        let tx = (x % self.size) as usize;
        let ty = (y % self.size) as usize;
        self.values[ty * self.size as usize + tx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ranks_are_a_permutation() {
        let tile = BlueNoiseTile::generate(16, 1).unwrap();
        let n = 256;
        let mut ranks: Vec<usize> = tile
            .values()
            .iter()
            .map(|v| (v * n as f64 - 0.5).round() as usize)
            .collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = BlueNoiseTile::generate(16, 9).unwrap();
        let b = BlueNoiseTile::generate(16, 9).unwrap();
        let c = BlueNoiseTile::generate(16, 10).unwrap();
        assert_eq!(a.values(), b.values());
        assert_ne!(a.values(), c.values());
    }

    #[test]
    fn test_block_means_are_flatter_than_white_noise() {
        // White noise with 16-texel blocks has a block-mean std of ~0.072.
        let tile = BlueNoiseTile::generate(32, 4).unwrap();
        let mut means = Vec::new();
        for by in 0..8u32 {
            for bx in 0..8u32 {
                let mut sum = 0.0;
                for y in 0..4 {
                    for x in 0..4 {
                        sum += tile.sample(bx * 4 + x, by * 4 + y);
                    }
                }
                means.push(sum / 16.0);
            }
        }
        let mean = means.iter().sum::<f64>() / means.len() as f64;
        let var = means.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / means.len() as f64;
        assert!(var.sqrt() < 0.05, "block std {}", var.sqrt());
    }

    #[test]
    fn test_sample_wraps() {
        let tile = BlueNoiseTile::generate(8, 2).unwrap();
        assert_eq!(tile.sample(3, 5), tile.sample(11, 13));
        assert_eq!(tile.sample(0, 0), tile.sample(8, 16));
    }

    #[test]
    fn test_tile_too_small() {
        assert!(matches!(
            BlueNoiseTile::generate(1, 0),
            Err(NoiseError::TileTooSmall(1))
        ));
    }

    #[test]
    fn test_from_gray_crops_to_square() {
        let image = GrayImage {
            width: 3,
            height: 2,
            data: vec![0.0, 0.25, 0.9, 0.5, 1.0, 0.1],
        };
        let tile = BlueNoiseTile::from_gray(&image).unwrap();
        assert_eq!(tile.size(), 2);
        assert_eq!(tile.values()[..3], [0.0, 0.25, 0.5]);
        assert!(tile.values()[3] < 1.0);
    }

    #[test]
    fn test_from_gray_empty() {
        let image = GrayImage {
            width: 0,
            height: 0,
            data: vec![],
        };
        assert!(matches!(
            BlueNoiseTile::from_gray(&image),
            Err(NoiseError::EmptyTile)
        ));
    }
}
