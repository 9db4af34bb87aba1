//! Per-frame parameter snapshot and the enumerated controls it carries.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Default render resolution.
pub const DEFAULT_RESOLUTION: [u32; 2] = [512, 512];

/// Default blue-noise tile period in texels.
pub const DEFAULT_NOISE_TILE: u32 = 64;

/// Maps a float-valued control onto an index in `0..count`.
///
/// Index `k` owns the half-open interval `[k - 0.5, k + 0.5)`, so a value of
/// exactly `0.5` selects index 1. Out-of-range values clamp; NaN selects 0.
pub fn selector_index(value: f64, count: usize) -> usize {
    if count == 0 || value.is_nan() {
        return 0;
    }
    let k = (value + 0.5).floor();
    if k <= 0.0 {
        0
    } else {
        (k as usize).min(count - 1)
    }
}

/// Error returned when parsing an enumerated control from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Control name (e.g. "encoding").
    pub control: &'static str,
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} '{}'", self.control, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

fn normalize_name(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}

/// Which normal representation the candidate path uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMode {
    /// Full-precision normal, no codec.
    GroundTruth,
    /// Two-channel XY with reconstructed Z, round-to-nearest quantization.
    #[default]
    Cartesian,
    /// Hemispherical octahedral mapping.
    HemiOct,
    /// Early Cartesian variant that quantizes with floor.
    CartesianFloor,
}

impl EncodingMode {
    /// Returns all modes in selector order.
    pub fn all() -> &'static [EncodingMode] {
        &[
            EncodingMode::GroundTruth,
            EncodingMode::Cartesian,
            EncodingMode::HemiOct,
            EncodingMode::CartesianFloor,
        ]
    }

    /// Returns the serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingMode::GroundTruth => "ground_truth",
            EncodingMode::Cartesian => "cartesian",
            EncodingMode::HemiOct => "hemi_oct",
            EncodingMode::CartesianFloor => "cartesian_floor",
        }
    }

    /// Short token used in capture filenames.
    pub fn tag(&self) -> &'static str {
        match self {
            EncodingMode::GroundTruth => "gt",
            EncodingMode::Cartesian => "cart",
            EncodingMode::HemiOct => "hemioct",
            EncodingMode::CartesianFloor => "cartfloor",
        }
    }

    /// Selects a mode from a float-valued control.
    pub fn from_selector(value: f64) -> Self {
        Self::all()[selector_index(value, Self::all().len())]
    }
}

impl FromStr for EncodingMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(s);
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == name || m.tag() == name)
            .ok_or(UnknownVariant {
                control: "encoding",
                value: s.to_string(),
            })
    }
}

/// How the pre-quantization coordinate is perturbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DitherMode {
    /// Quantize the coordinate as is.
    #[default]
    None,
    /// Constant-amplitude dither of one lattice step.
    Uniform,
    /// Amplitude weighted by the codec's local distortion (AJWD).
    Adaptive,
}

impl DitherMode {
    /// Returns all modes in selector order.
    pub fn all() -> &'static [DitherMode] {
        &[DitherMode::None, DitherMode::Uniform, DitherMode::Adaptive]
    }

    /// Returns the serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DitherMode::None => "none",
            DitherMode::Uniform => "uniform",
            DitherMode::Adaptive => "adaptive",
        }
    }

    /// Short token used in capture filenames.
    pub fn tag(&self) -> &'static str {
        match self {
            DitherMode::None => "nodither",
            DitherMode::Uniform => "uniform",
            DitherMode::Adaptive => "ajwd",
        }
    }

    /// Selects a mode from a float-valued control.
    pub fn from_selector(value: f64) -> Self {
        Self::all()[selector_index(value, Self::all().len())]
    }

    /// Returns true when any perturbation is applied.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, DitherMode::None)
    }
}

impl FromStr for DitherMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(s);
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == name || m.tag() == name)
            .ok_or(UnknownVariant {
                control: "dither",
                value: s.to_string(),
            })
    }
}

/// Source of per-pixel noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoiseMode {
    /// Tileable blue-noise field with decorrelated taps.
    #[default]
    BlueNoise,
    /// Closed-form interleaved gradient noise.
    Ign,
}

impl NoiseMode {
    /// Returns all modes in selector order.
    pub fn all() -> &'static [NoiseMode] {
        &[NoiseMode::BlueNoise, NoiseMode::Ign]
    }

    /// Returns the serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoiseMode::BlueNoise => "blue_noise",
            NoiseMode::Ign => "ign",
        }
    }

    /// Short token used in capture filenames.
    pub fn tag(&self) -> &'static str {
        match self {
            NoiseMode::BlueNoise => "blue",
            NoiseMode::Ign => "ign",
        }
    }

    /// Selects a mode from a float-valued control.
    pub fn from_selector(value: f64) -> Self {
        Self::all()[selector_index(value, Self::all().len())]
    }
}

impl FromStr for NoiseMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(s);
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == name || m.tag() == name)
            .ok_or(UnknownVariant {
                control: "noise",
                value: s.to_string(),
            })
    }
}

/// Probability density of the dither offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Uniform offset in [-0.5, 0.5) steps.
    #[default]
    Rectangular,
    /// Triangular offset in (-1, 1) steps.
    Triangular,
}

impl Distribution {
    /// Returns all distributions in selector order.
    pub fn all() -> &'static [Distribution] {
        &[Distribution::Rectangular, Distribution::Triangular]
    }

    /// Returns the serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Distribution::Rectangular => "rectangular",
            Distribution::Triangular => "triangular",
        }
    }

    /// Short token used in capture filenames.
    pub fn tag(&self) -> &'static str {
        match self {
            Distribution::Rectangular => "rect",
            Distribution::Triangular => "tri",
        }
    }

    /// Selects a distribution from a float-valued control.
    pub fn from_selector(value: f64) -> Self {
        Self::all()[selector_index(value, Self::all().len())]
    }
}

impl FromStr for Distribution {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(s);
        Self::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == name || m.tag() == name)
            .ok_or(UnknownVariant {
                control: "distribution",
                value: s.to_string(),
            })
    }
}

/// What the compositor shows for each pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visualization {
    /// The shaded candidate (or ground truth when no codec is active).
    #[default]
    Standard,
    /// Response difference amplified linearly and tinted.
    LinearDifference,
    /// Perceptually curved difference mapped through a heatmap.
    DifferenceHeatmap,
}

impl Visualization {
    /// Returns all visualizations in selector order.
    pub fn all() -> &'static [Visualization] {
        &[
            Visualization::Standard,
            Visualization::LinearDifference,
            Visualization::DifferenceHeatmap,
        ]
    }

    /// Returns the serialized name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visualization::Standard => "standard",
            Visualization::LinearDifference => "linear_difference",
            Visualization::DifferenceHeatmap => "difference_heatmap",
        }
    }

    /// Selects a visualization from a float-valued control.
    pub fn from_selector(value: f64) -> Self {
        Self::all()[selector_index(value, Self::all().len())]
    }
}

impl FromStr for Visualization {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = normalize_name(s);
        let found = match name.as_str() {
            "linear" => Some(Visualization::LinearDifference),
            "heatmap" => Some(Visualization::DifferenceHeatmap),
            _ => Self::all().iter().copied().find(|v| v.as_str() == name),
        };
        found.ok_or(UnknownVariant {
            control: "visualization",
            value: s.to_string(),
        })
    }
}

/// Number of quantization levels for a (possibly fractional) bit depth.
///
/// `2^bits - 1`, floored at 1 so a degenerate depth still yields a lattice.
#[inline]
pub fn levels_for_bits(bits: f64) -> f64 {
    (bits.exp2() - 1.0).max(1.0)
}

/// Immutable snapshot of every user-adjustable control plus host settings.
///
/// One snapshot is read per frame; mutation happens by replacing the whole
/// snapshot between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FrameParams {
    /// Normal representation used by the candidate path.
    pub encoding: EncodingMode,
    /// Dither applied before quantization.
    pub dither: DitherMode,
    /// Noise source feeding the dither.
    pub noise: NoiseMode,
    /// Dither probability density.
    pub distribution: Distribution,
    /// Bits per channel; quantization uses `2^bits - 1` levels.
    pub bit_depth: f64,
    /// Specular roughness.
    pub roughness: f64,
    /// Light azimuth in radians, `atan2(x, z)` convention.
    pub light_azimuth: f64,
    /// Light elevation in radians, `asin(y)` convention.
    pub light_elevation: f64,
    /// Multiplier on the one-step dither amplitude.
    pub noise_amplitude: f64,
    /// What to display.
    pub visualization: Visualization,
    /// Output image size `[width, height]`.
    pub resolution: [u32; 2],
    /// Distance of the camera from the sphere centre, on +Z.
    pub camera_distance: f64,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    /// Seed for generated blue noise.
    pub noise_seed: u32,
    /// Blue-noise tile period in texels.
    pub noise_tile_size: u32,
    /// Optional grayscale PNG to use as the blue-noise tile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blue_noise_path: Option<String>,
}

impl Default for FrameParams {
    fn default() -> Self {
        // Light along (1, 1, 1) normalized, as in the first experiment.
        let elevation = (1.0f64 / 3.0f64.sqrt()).asin();
        Self {
            encoding: EncodingMode::default(),
            dither: DitherMode::default(),
            noise: NoiseMode::default(),
            distribution: Distribution::default(),
            bit_depth: 8.0,
            roughness: 0.2,
            light_azimuth: FRAC_PI_4,
            light_elevation: elevation,
            noise_amplitude: 1.0,
            visualization: Visualization::default(),
            resolution: DEFAULT_RESOLUTION,
            camera_distance: 2.0,
            fov_y_degrees: 75.0,
            noise_seed: 0,
            noise_tile_size: DEFAULT_NOISE_TILE,
            blue_noise_path: None,
        }
    }
}

impl FrameParams {
    /// Creates a builder starting from the defaults.
    pub fn builder() -> FrameParamsBuilder {
        FrameParamsBuilder::default()
    }

    /// Parses parameters from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads parameters from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    /// Serializes the parameters to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the parameters to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the parameters to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Writes the parameters as pretty JSON to a file.
    pub fn save(&self, path: &Path) -> Result<(), SpecError> {
        let text = self.to_json_pretty()?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Number of quantization levels for this snapshot's bit depth.
    pub fn levels(&self) -> f64 {
        levels_for_bits(self.bit_depth)
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.resolution[0]
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.resolution[1]
    }

    /// Returns a copy with the light angles replaced, wrapping azimuth into
    /// [-pi, pi] and clamping elevation into [-pi/2, pi/2].
    pub fn with_light_angles(&self, azimuth: f64, elevation: f64) -> Self {
        let mut next = self.clone();
        next.light_azimuth = wrap_angle(azimuth);
        next.light_elevation = elevation.clamp(-FRAC_PI_2, FRAC_PI_2);
        next
    }
}

/// Wraps an angle into [-pi, pi].
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    if (-PI..=PI).contains(&angle) {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped < -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Builder for [`FrameParams`].
#[derive(Debug, Clone, Default)]
pub struct FrameParamsBuilder {
    params: FrameParams,
}

impl FrameParamsBuilder {
    /// Sets the encoding mode.
    pub fn encoding(mut self, encoding: EncodingMode) -> Self {
        self.params.encoding = encoding;
        self
    }

    /// Sets the dither mode.
    pub fn dither(mut self, dither: DitherMode) -> Self {
        self.params.dither = dither;
        self
    }

    /// Sets the noise source.
    pub fn noise(mut self, noise: NoiseMode) -> Self {
        self.params.noise = noise;
        self
    }

    /// Sets the dither distribution.
    pub fn distribution(mut self, distribution: Distribution) -> Self {
        self.params.distribution = distribution;
        self
    }

    /// Sets the bit depth per channel.
    pub fn bit_depth(mut self, bits: f64) -> Self {
        self.params.bit_depth = bits;
        self
    }

    /// Sets the roughness.
    pub fn roughness(mut self, roughness: f64) -> Self {
        self.params.roughness = roughness;
        self
    }

    /// Sets the light azimuth and elevation in radians.
    pub fn light(mut self, azimuth: f64, elevation: f64) -> Self {
        self.params.light_azimuth = azimuth;
        self.params.light_elevation = elevation;
        self
    }

    /// Sets the dither amplitude multiplier.
    pub fn noise_amplitude(mut self, amplitude: f64) -> Self {
        self.params.noise_amplitude = amplitude;
        self
    }

    /// Sets the visualization.
    pub fn visualization(mut self, visualization: Visualization) -> Self {
        self.params.visualization = visualization;
        self
    }

    /// Sets the output resolution.
    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.params.resolution = [width, height];
        self
    }

    /// Sets the camera distance and vertical field of view in degrees.
    pub fn camera(mut self, distance: f64, fov_y_degrees: f64) -> Self {
        self.params.camera_distance = distance;
        self.params.fov_y_degrees = fov_y_degrees;
        self
    }

    /// Sets the blue-noise seed and tile size.
    pub fn noise_tile(mut self, seed: u32, size: u32) -> Self {
        self.params.noise_seed = seed;
        self.params.noise_tile_size = size;
        self
    }

    /// Uses a PNG file as the blue-noise tile.
    pub fn blue_noise_path(mut self, path: impl Into<String>) -> Self {
        self.params.blue_noise_path = Some(path.into());
        self
    }

    /// Builds the parameters.
    pub fn build(self) -> FrameParams {
        self.params
    }
}
