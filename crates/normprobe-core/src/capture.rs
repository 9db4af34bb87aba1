//! Highlight-centred capture export.
//!
//! A capture crops a rendered frame around the perspective-correct highlight.
//! The crop grows with roughness (wider lobes need more context) and is
//! clamped to the smaller image dimension. Parts of the crop outside the
//! frame are filled with black.
//!
//! Each export owns its pixel buffer and writes through a uniquely named
//! temporary file that is renamed into place, so overlapping exports never
//! observe each other's partial output.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use normprobe_spec::{CaptureParameters, CropLabel, FrameParams};
use thiserror::Error;

use crate::buffer::FrameBuffer;
use crate::camera::PerspectiveCamera;
use crate::color::Color;
use crate::highlight::HighlightLocator;
use crate::light::direction_from_angles;
use crate::png::{write_rgb_to_vec_with_hash, PngConfig, PngError};

/// Crop edge length at zero roughness, in pixels.
pub const CROP_BASE: f64 = 256.0;

/// Extra crop pixels per unit roughness.
pub const CROP_ROUGHNESS_SCALE: f64 = 1500.0;

/// Fill color outside the frame.
pub const PADDING: Color = Color::black();

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export thread panicked")]
    ThreadPanicked,
}

/// Square region to cut from a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub center_x: f64,
    pub center_y: f64,
    pub size: u32,
}

impl CropRegion {
    /// Top-left pixel of the crop; may be negative.
    pub fn origin(&self) -> (i64, i64) {
        let half = (self.size / 2) as i64;
        (
            self.center_x.floor() as i64 - half,
            self.center_y.floor() as i64 - half,
        )
    }
}

/// Crop edge length for a roughness, clamped to the image.
pub fn crop_size(roughness: f64, width: u32, height: u32) -> u32 {
    let raw = (CROP_BASE + roughness * CROP_ROUGHNESS_SCALE).floor();
    let raw = if raw.is_finite() { raw.max(1.0) as u32 } else { CROP_BASE as u32 };
    raw.min(width.min(height)).max(1)
}

/// Copy a region out of a frame, filling out-of-bounds pixels with black.
pub fn crop(frame: &FrameBuffer, region: &CropRegion) -> FrameBuffer {
    let (left, top) = region.origin();
    let mut out = FrameBuffer::new(region.size, region.size, PADDING);
    for y in 0..region.size {
        for x in 0..region.size {
            if let Some(c) = frame.get_checked(left + x as i64, top + y as i64) {
                out.set(x, y, c);
            }
        }
    }
    out
}

/// A cropped image together with its export filename.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub buffer: FrameBuffer,
    pub file_name: String,
    pub label: CropLabel,
    pub region: Option<CropRegion>,
}

/// Result of a completed export.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOutput {
    pub path: PathBuf,
    /// BLAKE3 hex digest of the PNG bytes.
    pub hash: String,
    pub width: u32,
    pub height: u32,
    pub label: CropLabel,
}

/// Handle to an export running on its own thread.
#[derive(Debug)]
pub struct ExportHandle {
    inner: JoinHandle<Result<CaptureOutput, CaptureError>>,
}

impl ExportHandle {
    /// Block until the export finishes.
    pub fn wait(self) -> Result<CaptureOutput, CaptureError> {
        self.inner.join().map_err(|_| CaptureError::ThreadPanicked)?
    }

    /// Whether the export thread has finished.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

/// Writes captures into an output directory.
#[derive(Debug, Clone)]
pub struct CaptureExporter {
    pub out_dir: PathBuf,
    pub locator: HighlightLocator,
    pub png: PngConfig,
}

impl CaptureExporter {
    /// Exporter writing into `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            locator: HighlightLocator::default(),
            png: PngConfig::default(),
        }
    }

    /// Crop region centred on the highlight for the params' light.
    ///
    /// Falls back to the image centre if the highlight cannot be projected.
    pub fn plan(&self, params: &FrameParams, camera: &PerspectiveCamera) -> CropRegion {
        let light = direction_from_angles(params.light_azimuth, params.light_elevation);
        let size = crop_size(params.roughness, camera.width, camera.height);
        let [center_x, center_y] = match self.locator.locate_pixel(light, camera) {
            Some(p) if p[0].is_finite() && p[1].is_finite() => p,
            _ => {
                log::warn!("highlight is not visible, centring the capture on the image");
                [camera.width as f64 / 2.0, camera.height as f64 / 2.0]
            }
        };
        CropRegion {
            center_x,
            center_y,
            size,
        }
    }

    /// Highlight-centred crop of a rendered frame.
    pub fn capture(
        &self,
        frame: &FrameBuffer,
        params: &FrameParams,
        camera: &PerspectiveCamera,
    ) -> CapturedImage {
        let region = self.plan(params, camera);
        let label = CropLabel::Crop(region.size);
        log::debug!(
            "capture crop {}px at ({:.1}, {:.1})",
            region.size,
            region.center_x,
            region.center_y
        );
        CapturedImage {
            buffer: crop(frame, &region),
            file_name: CaptureParameters::from_params(params).file_name(label),
            label,
            region: Some(region),
        }
    }

    /// Whole frame, uncropped.
    pub fn capture_full(&self, frame: &FrameBuffer, params: &FrameParams) -> CapturedImage {
        let label = CropLabel::Full;
        CapturedImage {
            buffer: frame.clone(),
            file_name: CaptureParameters::from_params(params).file_name(label),
            label,
            region: None,
        }
    }

    /// Crop and write synchronously.
    pub fn export(
        &self,
        frame: &FrameBuffer,
        params: &FrameParams,
        camera: &PerspectiveCamera,
    ) -> Result<CaptureOutput, CaptureError> {
        let image = self.capture(frame, params, camera);
        write_capture(&self.out_dir, image, &self.png)
    }

    /// Write the whole frame synchronously.
    pub fn export_full(
        &self,
        frame: &FrameBuffer,
        params: &FrameParams,
    ) -> Result<CaptureOutput, CaptureError> {
        let image = self.capture_full(frame, params);
        write_capture(&self.out_dir, image, &self.png)
    }

    /// Crop on the calling thread, then encode and write on a new thread.
    pub fn spawn_export(
        &self,
        frame: &FrameBuffer,
        params: &FrameParams,
        camera: &PerspectiveCamera,
    ) -> Result<ExportHandle, CaptureError> {
        let image = self.capture(frame, params, camera);
        self.spawn_write(image)
    }

    /// Write an already captured image on a new thread.
    pub fn spawn_write(&self, image: CapturedImage) -> Result<ExportHandle, CaptureError> {
        let out_dir = self.out_dir.clone();
        let config = self.png.clone();
        let inner = std::thread::Builder::new()
            .name("normprobe-export".into())
            .spawn(move || write_capture(&out_dir, image, &config))?;
        Ok(ExportHandle { inner })
    }
}

/// Encode a captured image and move it into `out_dir` under its filename.
pub fn write_capture(
    out_dir: &Path,
    image: CapturedImage,
    config: &PngConfig,
) -> Result<CaptureOutput, CaptureError> {
    std::fs::create_dir_all(out_dir)?;
    let (bytes, hash) = write_rgb_to_vec_with_hash(&image.buffer, config)?;

    let path = out_dir.join(&image.file_name);
    let temp = out_dir.join(format!(
        ".{}.{}-{}.tmp",
        image.file_name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&temp, &bytes)?;
    if let Err(e) = std::fs::rename(&temp, &path) {
        let _ = std::fs::remove_file(&temp);
        return Err(e.into());
    }

    log::info!("exported {} ({} bytes)", path.display(), bytes.len());
    Ok(CaptureOutput {
        path,
        hash,
        width: image.buffer.width,
        height: image.buffer.height,
        label: image.label,
    })
}
