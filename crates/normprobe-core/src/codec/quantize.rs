//! The `round(x * levels) / levels` lattice step shared by every codec.

use glam::DVec2;
pub use normprobe_spec::levels_for_bits;


/// How a lattice coordinate snaps to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round to nearest level (current behaviour).
    Nearest,
    /// Truncate toward zero (early Cartesian experiment).
    Floor,
}

/// Snaps coordinates in [0, 1] onto `levels + 1` evenly spaced values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    levels: f64,
    rounding: Rounding,
}

impl Quantizer {
    /// Create a quantizer for a bit depth.
    pub fn new(bits: f64, rounding: Rounding) -> Self {
        Self {
            levels: levels_for_bits(bits),
            rounding,
        }
    }

    /// Create a quantizer directly from a level count.
    pub fn with_levels(levels: f64, rounding: Rounding) -> Self {
        Self {
            levels: levels.max(1.0),
            rounding,
        }
    }

    /// Number of levels.
    pub fn levels(&self) -> f64 {
        self.levels
    }

    /// Rounding behaviour.
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Size of one lattice step in [0, 1] space.
    pub fn step(&self) -> f64 {
        1.0 / self.levels
    }

    /// Quantize one channel. Inputs outside [0, 1] are clamped first.
    #[inline]
    pub fn quantize_channel(&self, x: f64) -> f64 {
        let x = if x.is_nan() { 0.5 } else { x.clamp(0.0, 1.0) };
        let scaled = x * self.levels;
        let snapped = match self.rounding {
            Rounding::Nearest => scaled.round(),
            Rounding::Floor => scaled.floor(),
        };
        snapped / self.levels
    }

    /// Quantize both channels of a lattice coordinate.
    #[inline]
    pub fn quantize(&self, coord: DVec2) -> DVec2 {
        DVec2::new(self.quantize_channel(coord.x), self.quantize_channel(coord.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_follow_frame_params() {
        for bits in [0.5, 2.0, 5.5, 8.0, 16.0] {
            let params = normprobe_spec::FrameParams::builder().bit_depth(bits).build();
            assert_eq!(Quantizer::new(bits, Rounding::Nearest).levels(), params.levels());
        }
        assert_eq!(Quantizer::new(0.5, Rounding::Floor).levels(), 1.0);
    }

    #[test]
    fn test_round_vs_floor() {
        let nearest = Quantizer::new(2.0, Rounding::Nearest);
        let floor = Quantizer::new(2.0, Rounding::Floor);
        // 0.3 * 3 = 0.9
        assert_eq!(nearest.quantize_channel(0.3), 1.0 / 3.0);
        assert_eq!(floor.quantize_channel(0.3), 0.0);
        assert_eq!(nearest.quantize_channel(1.0), 1.0);
        assert_eq!(floor.quantize_channel(1.0), 1.0);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let q = Quantizer::new(4.0, Rounding::Nearest);
        assert_eq!(q.quantize_channel(-0.2), 0.0);
        assert_eq!(q.quantize_channel(1.3), 1.0);
        assert_eq!(q.quantize_channel(f64::NAN), q.quantize_channel(0.5));
    }

    #[test]
    fn test_outputs_lie_on_lattice() {
        let q = Quantizer::new(5.0, Rounding::Nearest);
        for i in 0..=100 {
            let v = q.quantize_channel(i as f64 / 100.0) * q.levels();
            assert!((v - v.round()).abs() < 1e-9);
        }
    }
}
