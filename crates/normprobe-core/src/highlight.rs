//! Screen-space location of the specular highlight on the probe sphere.
//!
//! Live shading can treat the viewer as infinitely far away, but a capture
//! must be centred on the highlight as it actually appears in perspective.
//! On a unit sphere the surface point with normal `H` is `H` itself, so the
//! highlight is the fixed point of `H = normalize(L + normalize(C - H))`.
//! A few rounds of substitution starting from the infinite-viewer guess get
//! there for the default scene; other geometry needs the iteration count
//! re-checked.

use glam::DVec3;

use crate::camera::{PerspectiveCamera, UnitSphere};
use crate::codec::normalize_or;

/// Refinement rounds after the infinite-viewer guess.
pub const DEFAULT_ITERATIONS: usize = 3;

/// Locates the mirror highlight of a directional light on a unit sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightLocator {
    pub iterations: usize,
    pub sphere: UnitSphere,
}

impl Default for HighlightLocator {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            sphere: UnitSphere::default(),
        }
    }
}

impl HighlightLocator {
    /// Locator with a custom iteration count.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    /// World-space highlight point for a light direction and camera position.
    pub fn locate(&self, light: DVec3, camera_position: DVec3) -> DVec3 {
        let l = normalize_or(light, DVec3::Z);
        let eye = camera_position - self.sphere.center;
        let mut v = normalize_or(eye, DVec3::Z);
        for _ in 0..self.iterations {
            let h = normalize_or(l + v, v);
            v = normalize_or(eye - h, v);
        }
        self.sphere.center + normalize_or(l + v, v)
    }

    /// Highlight position in continuous pixel coordinates.
    ///
    /// `None` if the point projects behind the camera.
    pub fn locate_pixel(&self, light: DVec3, camera: &PerspectiveCamera) -> Option<[f64; 2]> {
        let point = self.locate(light, camera.position);
        let pixel = camera.project_to_pixel(point);
        log::debug!("highlight at {:?} -> pixel {:?}", point, pixel);
        pixel
    }
}
