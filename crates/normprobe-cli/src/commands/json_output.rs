//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json`; the output is always a [`CommandOutput`]
//! envelope whose `result` holds the command-specific payload.

use normprobe_spec::{ValidationError, ValidationWarning};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// These codes are stable. Validation failures pass through the `E0xx`
/// codes of the params validator instead.
pub mod error_codes {
    /// A params or image file could not be read or parsed
    pub const FILE_READ: &str = "CLI_001";
    /// Params failed validation
    pub const INVALID_PARAMS: &str = "CLI_002";
    /// Frame rendering failed (e.g. noise tile could not be built)
    pub const RENDER: &str = "CLI_003";
    /// Writing an output file failed
    pub const WRITE: &str = "CLI_004";
    /// Two images could not be compared
    pub const COMPARE: &str = "CLI_005";
    /// Unsupported codec for the requested analysis
    pub const UNSUPPORTED_CODEC: &str = "CLI_006";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g. "CLI_001", "E003")
    pub code: String,
    pub message: String,
    /// Params field the error refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl From<&ValidationError> for JsonError {
    fn from(err: &ValidationError) -> Self {
        Self {
            code: err.code.code().to_string(),
            message: err.message.clone(),
            path: err.path.clone(),
            file: None,
        }
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&ValidationWarning> for JsonWarning {
    fn from(warn: &ValidationWarning) -> Self {
        Self {
            code: warn.code.code().to_string(),
            message: warn.message.clone(),
            path: warn.path.clone(),
        }
    }
}

/// Envelope shared by every command's `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput<T> {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> CommandOutput<T> {
    pub fn success(result: T) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            result: Some(result),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            warnings: Vec::new(),
            result: None,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<JsonWarning>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Per-frame response error summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameStats {
    pub covered_pixels: u64,
    pub differing_pixels: u64,
    pub mean_error: f64,
    pub max_error: f64,
}

impl From<normprobe_core::render::ErrorStats> for FrameStats {
    fn from(stats: normprobe_core::render::ErrorStats) -> Self {
        Self {
            covered_pixels: stats.covered_pixels,
            differing_pixels: stats.differing_pixels,
            mean_error: stats.mean_error,
            max_error: stats.max_error,
        }
    }
}

/// Result of `render`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    pub output: String,
    pub view: String,
    pub width: u32,
    pub height: u32,
    /// BLAKE3 hash of the written PNG
    pub hash: String,
    /// Canonical hash of the params snapshot
    pub params_hash: String,
    pub stats: FrameStats,
}

/// Result of `export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub path: String,
    pub hash: String,
    pub params_hash: String,
    pub width: u32,
    pub height: u32,
    /// Crop size in pixels, absent for full-frame exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<u32>,
    /// Crop centre in pixels, absent for full-frame exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 2]>,
}

/// Result of `pick`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickResult {
    pub x: f64,
    pub y: f64,
    /// Whether the pointer hit the sphere
    pub hit: bool,
    pub azimuth_degrees: f64,
    pub elevation_degrees: f64,
    pub direction: [f64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<String>,
}

/// One codec at one bit depth in `sweep`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepEntry {
    pub encoding: String,
    pub bits: f64,
    pub mean_degrees: f64,
    pub max_degrees: f64,
}

/// Result of `sweep`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    pub samples: usize,
    pub seed: u32,
    pub entries: Vec<SweepEntry>,
}

/// Result of `distortion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistortionResult {
    pub encoding: String,
    pub resolution: u32,
    pub samples: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Result of `compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResult {
    pub file_a: String,
    pub file_b: String,
    pub hash_a: String,
    pub hash_b: String,
    pub identical: bool,
    pub width: u32,
    pub height: u32,
    pub ssim: f64,
    pub mean_abs_diff: f64,
    pub max_abs_diff: u8,
    pub differing_pixels: u64,
}

/// Result of `validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResult {
    pub params_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_omits_result() {
        let output: CommandOutput<ValidateResult> =
            CommandOutput::failure(vec![JsonError::new(error_codes::FILE_READ, "missing")
                .with_file("params.json")]);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("result").is_none());
        assert_eq!(json["errors"][0]["code"], "CLI_001");
        assert_eq!(json["errors"][0]["file"], "params.json");
        assert!(json["errors"][0].get("path").is_none());
    }

    #[test]
    fn test_success_carries_result() {
        let output = CommandOutput::success(ValidateResult {
            params_hash: "abc".into(),
        });
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["result"]["params_hash"], "abc");
    }
}
