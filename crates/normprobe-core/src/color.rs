//! Linear RGB colors used for shaded pixels and heatmaps.

/// RGB color with f64 channels, nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Equal value on all channels; responses are shown this way.
    pub const fn gray(value: f64) -> Self {
        Self::rgb(value, value, value)
    }

    pub const fn black() -> Self {
        Self::gray(0.0)
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::rgb(f(self.r), f(self.g), f(self.b))
    }

    fn zip(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::rgb(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    /// Blend toward `other`; `t` is clamped to [0, 1].
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        self.zip(*other, |a, b| a + (b - a) * t)
    }

    pub fn abs_diff(&self, other: &Color) -> Color {
        self.zip(*other, |a, b| (a - b).abs())
    }

    pub fn max_channel(&self) -> f64 {
        self.r.max(self.g).max(self.b)
    }

    /// Saturate into displayable range.
    pub fn clamp(&self) -> Color {
        self.map(|v| v.clamp(0.0, 1.0))
    }

    /// Quantize for PNG output, saturating first.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let c = self.clamp();
        [c.r, c.g, c.b].map(|v| (v * 255.0).round() as u8)
    }

    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r as f64, g as f64, b as f64).map(|v| v / 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb8_round_trip() {
        let c = Color::from_rgb8([12, 128, 255]);
        assert_eq!(c.to_rgb8(), [12, 128, 255]);
    }

    #[test]
    fn test_to_rgb8_clamps() {
        assert_eq!(Color::rgb(-1.0, 0.5, 2.0).to_rgb8(), [0, 128, 255]);
    }

    #[test]
    fn test_abs_diff_of_self_is_zero() {
        let c = Color::rgb(0.3, 0.6, 0.9);
        assert_eq!(c.abs_diff(&c), Color::black());
        assert_eq!(c.abs_diff(&Color::black()).max_channel(), 0.9);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::black();
        let b = Color::rgb(1.0, 0.5, 0.25);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 4.0), b);
    }
}
