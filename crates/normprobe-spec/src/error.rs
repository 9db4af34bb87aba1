//! Error types for parameter validation and loading.

use std::fmt;

use thiserror::Error;

/// Declares a diagnostic code enum whose variants print as their stable code.
macro_rules! diagnostic_codes {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $code:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Stable code string, as written into reports.
            pub fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

diagnostic_codes! {
    /// Rejections raised by [`crate::validate_params`].
    ErrorCode {
        /// Bit depth outside [2, 16]
        BitDepthOutOfRange => "E001",
        /// Roughness outside [0.01, 0.5]
        RoughnessOutOfRange => "E002",
        /// Light azimuth outside [-pi, pi]
        AzimuthOutOfRange => "E003",
        /// Light elevation outside [-pi/2, pi/2]
        ElevationOutOfRange => "E004",
        /// Noise amplitude outside [0, 2]
        AmplitudeOutOfRange => "E005",
        /// Zero or oversized frame dimension
        InvalidResolution => "E006",
        /// Camera inside the sphere, or an unusable field of view
        InvalidCamera => "E007",
        /// Blue-noise tile size is zero or too large
        InvalidNoiseTile => "E008",
        /// NaN or infinite numeric field
        NonFiniteValue => "E009",
    }
}

diagnostic_codes! {
    /// Settings that are legal but inert or unusual.
    WarningCode {
        /// Amplitude set while dithering is off
        AmplitudeWithoutDither => "W001",
        /// Blue-noise settings given while IGN is selected
        BlueNoiseSettingsUnused => "W002",
        /// Codec settings given while showing the ground truth
        GroundTruthIgnoresCodec => "W003",
        /// Legacy floor quantization
        LegacyFloorRounding => "W004",
    }
}

/// One coded finding about a parameter set, optionally tied to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic<C> {
    pub code: C,
    pub message: String,
    /// Name of the offending field (e.g., "bit_depth").
    pub path: Option<String>,
}

pub type ValidationError = Diagnostic<ErrorCode>;
pub type ValidationWarning = Diagnostic<WarningCode>;

impl<C> Diagnostic<C> {
    pub fn new(code: C, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(code: C, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(code, message)
        }
    }
}

impl<C: fmt::Display> fmt::Display for Diagnostic<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        match &self.path {
            Some(path) => write!(f, " (at {})", path),
            None => Ok(()),
        }
    }
}

impl<C: fmt::Debug + fmt::Display> std::error::Error for Diagnostic<C> {}

/// Failure loading or checking a params file.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("parameter validation failed with {0} error(s)")]
    ValidationFailed(usize),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the validator found; valid while `errors` is empty.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub ok: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.ok = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Warnings when valid, otherwise every error.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.ok {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_print_stably() {
        assert_eq!(ErrorCode::NonFiniteValue.to_string(), "E009");
        assert_eq!(WarningCode::LegacyFloorRounding.code(), "W004");
    }

    #[test]
    fn test_error_display_with_path() {
        let err = ValidationError::with_path(
            ErrorCode::BitDepthOutOfRange,
            "bit_depth must be in [2, 16]",
            "bit_depth",
        );
        assert_eq!(
            err.to_string(),
            "E001: bit_depth must be in [2, 16] (at bit_depth)"
        );
        let bare = ValidationError::new(ErrorCode::InvalidCamera, "inside sphere");
        assert_eq!(bare.to_string(), "E007: inside sphere");
    }

    #[test]
    fn test_result_tracks_errors() {
        let mut result = ValidationResult::success();
        assert!(result.is_ok());

        result.add_warning(ValidationWarning::with_path(
            WarningCode::LegacyFloorRounding,
            "legacy",
            "encoding",
        ));
        assert!(result.is_ok());

        result.add_error(ValidationError::new(ErrorCode::NonFiniteValue, "nan"));
        assert!(!result.is_ok());
        assert_eq!(result.into_result().unwrap_err().len(), 1);
    }
}
