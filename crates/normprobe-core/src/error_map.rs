//! Ground-truth versus candidate error visualization.

use normprobe_spec::Visualization;

use crate::buffer::FrameBuffer;
use crate::color::Color;

/// Default gain of the linear difference view.
pub const LINEAR_GAIN: f64 = 10.0;

/// Default gain applied after the square-root curve of the heatmap.
pub const HEATMAP_GAIN: f64 = 2.0;

/// Heatmap position of the hard step between the cold and hot ramps.
pub const HEATMAP_THRESHOLD: f64 = 0.5;

const HEATMAP_COLD: Color = Color::rgb(0.0, 0.0, 1.0);
const HEATMAP_HOT_LOW: Color = Color::rgb(1.0, 0.0, 0.0);
const HEATMAP_HOT_HIGH: Color = Color::rgb(1.0, 1.0, 0.0);

/// Differences two responses and maps the result to a display color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorAnalyzer {
    pub linear_gain: f64,
    pub heatmap_gain: f64,
}

impl Default for ErrorAnalyzer {
    fn default() -> Self {
        Self {
            linear_gain: LINEAR_GAIN,
            heatmap_gain: HEATMAP_GAIN,
        }
    }
}

impl ErrorAnalyzer {
    /// Absolute difference of two scalar responses.
    #[inline]
    pub fn difference(ground_truth: f64, candidate: f64) -> f64 {
        (ground_truth - candidate).abs()
    }

    /// Linear view: amplified error in the red channel.
    pub fn linear(&self, error: f64) -> Color {
        Color::rgb((error * self.linear_gain).clamp(0.0, 1.0), 0.0, 0.0)
    }

    /// Curved view: `sqrt(error)`, scaled, through a black→blue | red→yellow
    /// ramp with a hard step at [`HEATMAP_THRESHOLD`].
    pub fn heatmap(&self, error: f64) -> Color {
        let t = (error.max(0.0).sqrt() * self.heatmap_gain).clamp(0.0, 1.0);
        if t < HEATMAP_THRESHOLD {
            Color::black().lerp(&HEATMAP_COLD, t / HEATMAP_THRESHOLD)
        } else {
            HEATMAP_HOT_LOW.lerp(
                &HEATMAP_HOT_HIGH,
                (t - HEATMAP_THRESHOLD) / (1.0 - HEATMAP_THRESHOLD),
            )
        }
    }

    /// Pick the displayed color for one pixel.
    pub fn present(
        &self,
        visualization: Visualization,
        ground_truth: f64,
        candidate: f64,
    ) -> Color {
        match visualization {
            Visualization::Standard => Color::gray(candidate.clamp(0.0, 1.0)),
            Visualization::LinearDifference => {
                self.linear(Self::difference(ground_truth, candidate))
            }
            Visualization::DifferenceHeatmap => {
                self.heatmap(Self::difference(ground_truth, candidate))
            }
        }
    }

    /// Per-channel absolute difference of two frames.
    ///
    /// Returns `None` when the dimensions differ.
    pub fn difference_frame(a: &FrameBuffer, b: &FrameBuffer) -> Option<FrameBuffer> {
        if a.width != b.width || a.height != b.height {
            return None;
        }
        let data = a
            .data
            .iter()
            .zip(&b.data)
            .map(|(x, y)| x.abs_diff(y))
            .collect();
        Some(FrameBuffer {
            width: a.width,
            height: a.height,
            data,
        })
    }

    /// Heatmap of a difference frame, using each pixel's largest channel.
    pub fn heatmap_frame(&self, difference: &FrameBuffer) -> FrameBuffer {
        FrameBuffer {
            width: difference.width,
            height: difference.height,
            data: difference
                .data
                .iter()
                .map(|c| self.heatmap(c.max_channel()))
                .collect(),
        }
    }
}
