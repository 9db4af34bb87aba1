//! normprobe numerical core
//!
//! This crate implements the pipeline that compares lossy unit-normal
//! encodings against a full-precision reference through a fixed specular
//! response. Everything is deterministic: the same parameter snapshot and
//! noise seed always produce the same frame, the same capture and the same
//! PNG bytes.
//!
//! # Pipeline
//!
//! - **Codecs**: Cartesian (XY + reconstructed Z, round or legacy floor) and
//!   hemi-octahedral, with an analytic distortion metric
//! - **Noise**: void-and-cluster blue noise with decorrelated taps, or
//!   interleaved gradient noise
//! - **Dither**: rectangular or triangular, uniform or distortion-weighted
//!   (AJWD)
//! - **Specular**: Blinn-Phong response shared by ground truth and candidate
//! - **Error map**: linear difference or curved heatmap
//! - **Light / highlight / capture**: pick-driven light control, perspective
//!   highlight location and highlight-centred PNG export
//!
//! # Example
//!
//! ```
//! use normprobe_core::{FrameRenderer, InterleavedGradient};
//! use normprobe_spec::{EncodingMode, FrameParams, Visualization};
//!
//! let params = FrameParams::builder()
//!     .encoding(EncodingMode::HemiOct)
//!     .bit_depth(6.0)
//!     .visualization(Visualization::DifferenceHeatmap)
//!     .resolution(32, 32)
//!     .build();
//!
//! let frame = FrameRenderer::from_params(&params).render(&params, &InterleavedGradient);
//! assert_eq!(frame.display.width, 32);
//! assert!(frame.stats.covered_pixels > 0);
//! ```

pub mod analysis;
pub mod buffer;
pub mod camera;
pub mod capture;
pub mod codec;
pub mod color;
pub mod dither;
pub mod error_map;
pub mod highlight;
pub mod light;
pub mod noise;
pub mod png;
pub mod render;
pub mod rng;
pub mod specular;

pub use analysis::{distortion_survey, reconstruction_error, DistortionSurvey, ReconstructionError};
pub use buffer::FrameBuffer;
pub use camera::{PerspectiveCamera, Ray, SurfaceHit, SurfacePick, UnitSphere};
pub use capture::{CaptureError, CaptureExporter, CaptureOutput, CropRegion, ExportHandle};
pub use codec::{CartesianCodec, Codec, HemiOctCodec, NormalCodec, Quantizer, Rounding};
pub use color::Color;
pub use dither::DitherEngine;
pub use error_map::ErrorAnalyzer;
pub use highlight::HighlightLocator;
pub use light::{LightController, LightState};
pub use noise::{BlueNoiseTile, InterleavedGradient, NoiseError, NoiseField, NoiseSource};
pub use png::{PngConfig, PngError};
pub use render::{shade_pixel, FrameRenderer, PixelContext, RenderedFrame};
pub use rng::DeterministicRng;
pub use specular::specular_response;
