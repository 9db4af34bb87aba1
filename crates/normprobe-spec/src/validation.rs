//! Range and consistency checks for [`FrameParams`].

use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::params::{DitherMode, EncodingMode, FrameParams, NoiseMode, DEFAULT_NOISE_TILE};

/// Allowed bit depth range per channel.
pub const BIT_DEPTH_RANGE: (f64, f64) = (2.0, 16.0);
/// Allowed roughness range.
pub const ROUGHNESS_RANGE: (f64, f64) = (0.01, 0.5);
/// Allowed dither amplitude multiplier range.
pub const AMPLITUDE_RANGE: (f64, f64) = (0.0, 2.0);
/// Largest accepted image dimension.
pub const MAX_DIMENSION: u32 = 8192;
/// Largest accepted blue-noise tile.
pub const MAX_NOISE_TILE: u32 = 1024;

/// Slack on angle bounds so values produced by `atan2`/`asin` round trips pass.
const ANGLE_SLACK: f64 = 1e-9;

/// Validates a parameter snapshot.
pub fn validate_params(params: &FrameParams) -> ValidationResult {
    let mut result = ValidationResult::success();

    check_range(
        &mut result,
        "bit_depth",
        params.bit_depth,
        BIT_DEPTH_RANGE,
        ErrorCode::BitDepthOutOfRange,
    );
    check_range(
        &mut result,
        "roughness",
        params.roughness,
        ROUGHNESS_RANGE,
        ErrorCode::RoughnessOutOfRange,
    );
    check_range(
        &mut result,
        "light_azimuth",
        params.light_azimuth,
        (-PI - ANGLE_SLACK, PI + ANGLE_SLACK),
        ErrorCode::AzimuthOutOfRange,
    );
    check_range(
        &mut result,
        "light_elevation",
        params.light_elevation,
        (-FRAC_PI_2 - ANGLE_SLACK, FRAC_PI_2 + ANGLE_SLACK),
        ErrorCode::ElevationOutOfRange,
    );
    check_range(
        &mut result,
        "noise_amplitude",
        params.noise_amplitude,
        AMPLITUDE_RANGE,
        ErrorCode::AmplitudeOutOfRange,
    );

    let [width, height] = params.resolution;
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidResolution,
            format!(
                "resolution must be between 1x1 and {}x{}, got [{}, {}]",
                MAX_DIMENSION, MAX_DIMENSION, width, height
            ),
            "resolution",
        ));
    }

    if !params.camera_distance.is_finite() {
        result.add_error(non_finite("camera_distance", params.camera_distance));
    } else if params.camera_distance <= 1.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidCamera,
            format!(
                "camera_distance must be greater than the sphere radius 1, got {}",
                params.camera_distance
            ),
            "camera_distance",
        ));
    }

    if !params.fov_y_degrees.is_finite() {
        result.add_error(non_finite("fov_y_degrees", params.fov_y_degrees));
    } else if params.fov_y_degrees <= 0.0 || params.fov_y_degrees >= 180.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidCamera,
            format!(
                "fov_y_degrees must be in (0, 180), got {}",
                params.fov_y_degrees
            ),
            "fov_y_degrees",
        ));
    }

    if params.noise_tile_size == 0 || params.noise_tile_size > MAX_NOISE_TILE {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidNoiseTile,
            format!(
                "noise_tile_size must be in [1, {}], got {}",
                MAX_NOISE_TILE, params.noise_tile_size
            ),
            "noise_tile_size",
        ));
    }

    collect_warnings(params, &mut result);
    result
}

fn check_range(
    result: &mut ValidationResult,
    field: &str,
    value: f64,
    (min, max): (f64, f64),
    code: ErrorCode,
) {
    if !value.is_finite() {
        result.add_error(non_finite(field, value));
        return;
    }
    if value < min || value > max {
        result.add_error(ValidationError::with_path(
            code,
            format!("{} must be in [{}, {}], got {}", field, min, max, value),
            field,
        ));
    }
}

fn non_finite(field: &str, value: f64) -> ValidationError {
    ValidationError::with_path(
        ErrorCode::NonFiniteValue,
        format!("{} must be finite, got {}", field, value),
        field,
    )
}

fn collect_warnings(params: &FrameParams, result: &mut ValidationResult) {
    if !params.dither.is_enabled() && params.noise_amplitude != 1.0 {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::AmplitudeWithoutDither,
            "noise_amplitude has no effect while dither is 'none'",
            "noise_amplitude",
        ));
    }

    if params.noise == NoiseMode::Ign
        && (params.blue_noise_path.is_some() || params.noise_tile_size != DEFAULT_NOISE_TILE)
    {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::BlueNoiseSettingsUnused,
            "blue-noise tile settings are ignored while noise is 'ign'",
            "noise",
        ));
    }

    if params.encoding == EncodingMode::GroundTruth && params.dither != DitherMode::None {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::GroundTruthIgnoresCodec,
            "dither has no effect on the ground-truth encoding",
            "dither",
        ));
    }

    if params.encoding == EncodingMode::CartesianFloor {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::LegacyFloorRounding,
            "cartesian_floor truncates instead of rounding and is biased toward -1",
            "encoding",
        ));
    }
}
