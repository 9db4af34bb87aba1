//! Per-pixel pipeline and the software frame renderer.
//!
//! Shading happens in view space: the camera sits at the origin looking down
//! -Z, so the view vector of a surface point is `normalize(-position)`.

use glam::DVec3;
use normprobe_spec::{FrameParams, Visualization};

use crate::buffer::FrameBuffer;
use crate::camera::{PerspectiveCamera, SurfacePick, UnitSphere};
use crate::codec::{normalize_or, Codec, Quantizer};
use crate::color::Color;
use crate::dither::DitherEngine;
use crate::error_map::ErrorAnalyzer;
use crate::light::direction_from_angles;
use crate::noise::NoiseSource;
use crate::specular::specular_response;

/// Inputs the host provides for one pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelContext {
    /// Integer screen coordinate, used to key the noise.
    pub pixel: [u32; 2],
    /// Surface position in view space.
    pub position_view: DVec3,
    /// Unit geometric normal in view space.
    pub normal_view: DVec3,
    /// Unit direction toward the light in view space.
    pub light_view: DVec3,
}

impl PixelContext {
    /// Unit vector from the surface toward the camera.
    pub fn view_vector(&self) -> DVec3 {
        normalize_or(-self.position_view, self.normal_view)
    }
}

/// Both responses for one pixel and the color chosen for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedPixel {
    pub ground_truth: f64,
    pub candidate: f64,
    pub color: Color,
}

/// Per-frame pipeline state derived once from a parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPipeline {
    codec: Option<(Codec, Quantizer)>,
    dither: DitherEngine,
    analyzer: ErrorAnalyzer,
    roughness: f64,
    visualization: Visualization,
}

impl PixelPipeline {
    /// Build the pipeline for a snapshot.
    pub fn new(params: &FrameParams) -> Self {
        let codec = Codec::for_mode(params.encoding)
            .map(|(codec, rounding)| (codec, Quantizer::new(params.bit_depth, rounding)));
        Self {
            codec,
            dither: DitherEngine::from_params(params),
            analyzer: ErrorAnalyzer::default(),
            roughness: params.roughness,
            visualization: params.visualization,
        }
    }

    /// Candidate normal for a pixel; the input itself for ground truth.
    pub fn candidate_normal<N: NoiseSource + ?Sized>(
        &self,
        ctx: &PixelContext,
        noise: &N,
    ) -> DVec3 {
        match &self.codec {
            None => ctx.normal_view,
            Some((codec, quantizer)) => {
                self.dither
                    .encode(codec, ctx.normal_view, quantizer, noise, ctx.pixel)
            }
        }
    }

    /// Run the full pipeline for one pixel.
    pub fn shade<N: NoiseSource + ?Sized>(&self, ctx: &PixelContext, noise: &N) -> ShadedPixel {
        let v = ctx.view_vector();
        let ground_truth = specular_response(ctx.normal_view, v, ctx.light_view, self.roughness);
        let candidate = match self.codec {
            None => ground_truth,
            Some(_) => {
                let n = self.candidate_normal(ctx, noise);
                specular_response(n, v, ctx.light_view, self.roughness)
            }
        };
        ShadedPixel {
            ground_truth,
            candidate,
            color: self
                .analyzer
                .present(self.visualization, ground_truth, candidate),
        }
    }
}

/// Shade one pixel with a fresh pipeline built from `params`.
pub fn shade_pixel<N: NoiseSource + ?Sized>(
    ctx: &PixelContext,
    params: &FrameParams,
    noise: &N,
) -> ShadedPixel {
    PixelPipeline::new(params).shade(ctx, noise)
}

/// Summary of per-pixel response error over the covered pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ErrorStats {
    pub covered_pixels: u64,
    pub mean_error: f64,
    pub max_error: f64,
    /// Pixels whose candidate response differs from ground truth.
    pub differing_pixels: u64,
}

/// Output of one rendered frame.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub ground_truth: FrameBuffer,
    pub candidate: FrameBuffer,
    /// Frame as selected by the snapshot's visualization.
    pub display: FrameBuffer,
    pub stats: ErrorStats,
}

/// Renders the probe sphere one ray per pixel.
#[derive(Debug, Clone, Copy)]
pub struct FrameRenderer {
    pub camera: PerspectiveCamera,
    pub sphere: UnitSphere,
}

impl FrameRenderer {
    pub fn new(camera: PerspectiveCamera) -> Self {
        Self {
            camera,
            sphere: UnitSphere::default(),
        }
    }

    /// Renderer for the scene described by a snapshot.
    pub fn from_params(params: &FrameParams) -> Self {
        Self::new(PerspectiveCamera::from_params(params))
    }

    /// View-space light direction for the snapshot's angles.
    pub fn light_view(&self, params: &FrameParams) -> DVec3 {
        let world = direction_from_angles(params.light_azimuth, params.light_elevation);
        normalize_or(self.camera.to_view_direction(world), DVec3::Z)
    }

    /// Pixel context for `(x, y)`, or `None` if the ray misses the sphere.
    pub fn pixel_context(&self, x: u32, y: u32, light_view: DVec3) -> Option<PixelContext> {
        let ray = self.camera.ray_through_pixel(x, y);
        let hit = self.sphere.pick(&ray)?;
        Some(PixelContext {
            pixel: [x, y],
            position_view: self.camera.to_view_point(hit.point),
            normal_view: normalize_or(self.camera.to_view_direction(hit.normal), DVec3::Z),
            light_view,
        })
    }

    /// Render a frame. Pure given the snapshot and the noise source.
    pub fn render<N: NoiseSource + ?Sized>(
        &self,
        params: &FrameParams,
        noise: &N,
    ) -> RenderedFrame {
        let (width, height) = (self.camera.width, self.camera.height);
        let pipeline = PixelPipeline::new(params);
        let light_view = self.light_view(params);

        let mut ground_truth = FrameBuffer::new_black(width, height);
        let mut candidate = FrameBuffer::new_black(width, height);
        let mut display = FrameBuffer::new_black(width, height);
        let mut stats = ErrorStats::default();
        let mut error_sum = 0.0;

        for y in 0..height {
            for x in 0..width {
                let Some(ctx) = self.pixel_context(x, y, light_view) else {
                    continue;
                };
                let shaded = pipeline.shade(&ctx, noise);
                ground_truth.set(x, y, Color::gray(shaded.ground_truth.clamp(0.0, 1.0)));
                candidate.set(x, y, Color::gray(shaded.candidate.clamp(0.0, 1.0)));
                display.set(x, y, shaded.color);

                let error = ErrorAnalyzer::difference(shaded.ground_truth, shaded.candidate);
                stats.covered_pixels += 1;
                stats.max_error = stats.max_error.max(error);
                if error > 0.0 {
                    stats.differing_pixels += 1;
                }
                error_sum += error;
            }
        }
        if stats.covered_pixels > 0 {
            stats.mean_error = error_sum / stats.covered_pixels as f64;
        }

        log::debug!(
            "rendered {}x{} frame: {} covered pixels, mean error {:.6}, max {:.6}",
            width,
            height,
            stats.covered_pixels,
            stats.mean_error,
            stats.max_error
        );

        RenderedFrame {
            ground_truth,
            candidate,
            display,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::InterleavedGradient;
    use normprobe_spec::{DitherMode, EncodingMode};

    fn ctx(normal: DVec3) -> PixelContext {
        PixelContext {
            pixel: [4, 9],
            position_view: DVec3::new(0.0, 0.0, -1.0),
            normal_view: normal,
            light_view: DVec3::Z,
        }
    }

    #[test]
    fn test_ground_truth_has_zero_error() {
        let params = FrameParams::builder()
            .encoding(EncodingMode::GroundTruth)
            .visualization(Visualization::DifferenceHeatmap)
            .build();
        let n = DVec3::new(0.1, 0.2, 1.0).normalize();
        let shaded = shade_pixel(&ctx(n), &params, &InterleavedGradient);
        assert_eq!(shaded.ground_truth, shaded.candidate);
        assert_eq!(shaded.color, Color::black());
    }

    #[test]
    fn test_low_bit_candidate_differs() {
        let params = FrameParams::builder()
            .encoding(EncodingMode::Cartesian)
            .bit_depth(3.0)
            .roughness(0.1)
            .build();
        let n = DVec3::new(0.05, 0.03, 1.0).normalize();
        let shaded = shade_pixel(&ctx(n), &params, &InterleavedGradient);
        assert_ne!(shaded.ground_truth, shaded.candidate);
    }

    #[test]
    fn test_view_vector_points_at_camera() {
        let c = ctx(DVec3::Z);
        assert_eq!(c.view_vector(), DVec3::Z);
    }

    #[test]
    fn test_render_is_deterministic_and_covers_sphere() {
        let params = FrameParams::builder()
            .resolution(48, 32)
            .encoding(EncodingMode::HemiOct)
            .dither(DitherMode::Adaptive)
            .bit_depth(5.0)
            .build();
        let renderer = FrameRenderer::from_params(&params);
        let a = renderer.render(&params, &InterleavedGradient);
        let b = renderer.render(&params, &InterleavedGradient);
        assert_eq!(a.display, b.display);
        assert_eq!(a.stats, b.stats);
        assert!(a.stats.covered_pixels > 0);
        assert!(a.stats.covered_pixels < 48 * 32);
        // Corners miss the sphere.
        assert_eq!(a.display.get(0, 0), Color::black());
    }

    #[test]
    fn test_standard_ground_truth_display_matches_reference() {
        let params = FrameParams::builder()
            .resolution(16, 16)
            .encoding(EncodingMode::GroundTruth)
            .build();
        let frame = FrameRenderer::from_params(&params).render(&params, &InterleavedGradient);
        assert_eq!(frame.display, frame.ground_truth);
        assert_eq!(frame.stats.differing_pixels, 0);
    }
}
