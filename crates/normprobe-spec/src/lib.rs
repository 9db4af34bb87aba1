//! normprobe parameter library
//!
//! This crate holds the data model shared by the numerical core and the CLI:
//! the per-frame parameter snapshot, its validation, canonical hashing, and
//! the self-describing capture filename.
//!
//! # Example
//!
//! ```
//! use normprobe_spec::{validate_params, EncodingMode, DitherMode, FrameParams};
//!
//! let params = FrameParams::builder()
//!     .encoding(EncodingMode::HemiOct)
//!     .dither(DitherMode::Adaptive)
//!     .bit_depth(6.0)
//!     .build();
//!
//! let result = validate_params(&params);
//! assert!(result.is_ok());
//! assert_eq!(params.levels(), 63.0);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types for validation
//! - [`params`]: Parameter snapshot, enumerated controls, builder
//! - [`validation`]: Range and consistency checks
//! - [`hash`]: Canonical params hashing
//! - [`capture`]: Export snapshot and filename scheme

pub mod capture;
pub mod error;
pub mod hash;
pub mod params;
pub mod validation;

pub use capture::{CaptureParameters, CropLabel, CAPTURE_EXTENSION};
pub use error::{
    Diagnostic, ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use hash::{canonical_params_hash, canonical_value_hash, canonicalize_json};
pub use params::{
    levels_for_bits, selector_index, wrap_angle, DitherMode, Distribution, EncodingMode,
    FrameParams, FrameParamsBuilder, NoiseMode, UnknownVariant, Visualization,
    DEFAULT_NOISE_TILE, DEFAULT_RESOLUTION,
};
pub use validation::validate_params;
