//! Capture snapshot and the self-describing export filename.

use serde::{Deserialize, Serialize};

use crate::params::{DitherMode, Distribution, EncodingMode, FrameParams, NoiseMode};

/// Extension used for every exported frame.
pub const CAPTURE_EXTENSION: &str = "png";

/// Whether an export is a highlight crop or the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "size")]
pub enum CropLabel {
    /// Square crop of the given edge length in pixels.
    Crop(u32),
    /// Uncropped frame.
    Full,
}

impl CropLabel {
    fn token(&self) -> String {
        match self {
            CropLabel::Crop(size) => format!("c{}", size),
            CropLabel::Full => "full".to_string(),
        }
    }
}

/// Snapshot of every control that affects an exported image.
///
/// Taken once at export time and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureParameters {
    pub encoding: EncodingMode,
    pub dither: DitherMode,
    pub noise: NoiseMode,
    pub distribution: Distribution,
    pub bit_depth: f64,
    pub roughness: f64,
    pub noise_amplitude: f64,
    /// Light azimuth in degrees.
    pub azimuth_degrees: f64,
    /// Light elevation in degrees.
    pub elevation_degrees: f64,
}

impl CaptureParameters {
    /// Takes a snapshot of the given frame parameters.
    pub fn from_params(params: &FrameParams) -> Self {
        Self {
            encoding: params.encoding,
            dither: params.dither,
            noise: params.noise,
            distribution: params.distribution,
            bit_depth: params.bit_depth,
            roughness: params.roughness,
            noise_amplitude: params.noise_amplitude,
            azimuth_degrees: params.light_azimuth.to_degrees(),
            elevation_degrees: params.light_elevation.to_degrees(),
        }
    }

    /// Filename stem encoding every captured parameter.
    ///
    /// Numbers use fixed precision so the same snapshot always yields the
    /// same name: bits 2 dp, roughness 3 dp, amplitude 2 dp, angles in whole
    /// signed degrees.
    pub fn file_stem(&self, crop: CropLabel) -> String {
        format!(
            "{}_{}_{}_{}_{:.2}b_r{:.3}_a{:.2}_az{}_el{}_{}",
            self.encoding.tag(),
            self.dither.tag(),
            self.noise.tag(),
            self.distribution.tag(),
            self.bit_depth,
            self.roughness,
            self.noise_amplitude,
            signed_degrees(self.azimuth_degrees),
            signed_degrees(self.elevation_degrees),
            crop.token(),
        )
    }

    /// Full filename including the extension.
    pub fn file_name(&self, crop: CropLabel) -> String {
        format!("{}.{}", self.file_stem(crop), CAPTURE_EXTENSION)
    }
}

fn signed_degrees(degrees: f64) -> String {
    let whole = degrees.round() as i64;
    format!("{:+}", whole)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_name_encodes_everything() {
        let params = FrameParams::builder()
            .encoding(EncodingMode::HemiOct)
            .dither(DitherMode::Adaptive)
            .noise(NoiseMode::BlueNoise)
            .distribution(Distribution::Triangular)
            .bit_depth(8.0)
            .roughness(0.2)
            .noise_amplitude(1.0)
            .light(45f64.to_radians(), (-10f64).to_radians())
            .build();
        let capture = CaptureParameters::from_params(&params);
        assert_eq!(
            capture.file_name(CropLabel::Crop(556)),
            "hemioct_ajwd_blue_tri_8.00b_r0.200_a1.00_az+45_el-10_c556.png"
        );
        assert_eq!(
            capture.file_name(CropLabel::Full),
            "hemioct_ajwd_blue_tri_8.00b_r0.200_a1.00_az+45_el-10_full.png"
        );
    }

    #[test]
    fn test_file_name_deterministic() {
        let capture = CaptureParameters::from_params(&FrameParams::default());
        let a = capture.file_name(CropLabel::Crop(256));
        let b = capture.clone().file_name(CropLabel::Crop(256));
        assert_eq!(a, b);
        assert_eq!(a, "cart_nodither_blue_rect_8.00b_r0.200_a1.00_az+45_el+35_c256.png");
    }

    #[test]
    fn test_zero_angle_has_plus_sign() {
        let params = FrameParams::builder().light(-0.001, 0.0).build();
        let stem = CaptureParameters::from_params(&params).file_stem(CropLabel::Full);
        assert!(stem.contains("_az+0_el+0_"), "{}", stem);
    }
}
