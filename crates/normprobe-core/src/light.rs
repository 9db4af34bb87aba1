//! Light direction control.
//!
//! The light is held both as azimuth/elevation angles and as a unit
//! direction; every update keeps the two consistent. Azimuth is measured
//! from +Z toward +X, elevation from the XZ plane toward +Y.
//!
//! Pointer interaction follows a two-state machine:
//!
//! | State    | Event               | Result                              |
//! |----------|---------------------|-------------------------------------|
//! | Idle     | pointer down, hit   | Dragging, light recomputed          |
//! | Idle     | pointer down, miss  | Idle, light unchanged               |
//! | Dragging | pointer move, hit   | Dragging, light recomputed          |
//! | Dragging | pointer move, miss  | Dragging, light unchanged           |
//! | any      | pointer up          | Idle, light unchanged               |

use glam::DVec3;
use normprobe_spec::{wrap_angle, FrameParams};

use crate::camera::{Ray, SurfacePick};
use crate::codec::normalize_or;

/// Interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightState {
    #[default]
    Idle,
    Dragging,
}

/// Unit direction for azimuth/elevation angles in radians.
pub fn direction_from_angles(azimuth: f64, elevation: f64) -> DVec3 {
    let (sin_el, cos_el) = elevation.sin_cos();
    let (sin_az, cos_az) = azimuth.sin_cos();
    DVec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
}

/// Azimuth and elevation of a direction.
///
/// The direction is normalized first and `y` clamped to [-1, 1] so a vector
/// marginally longer than unit cannot push `asin` out of its domain.
pub fn angles_from_direction(direction: DVec3) -> (f64, f64) {
    let d = normalize_or(direction, DVec3::Z);
    let elevation = d.y.clamp(-1.0, 1.0).asin();
    let azimuth = d.x.atan2(d.z);
    (azimuth, elevation)
}

/// Light direction that mirrors the hit→camera direction about `normal`.
pub fn mirror_light(normal: DVec3, hit: DVec3, camera_position: DVec3) -> DVec3 {
    let n = normalize_or(normal, DVec3::Z);
    let v = normalize_or(camera_position - hit, n);
    normalize_or(n * (2.0 * n.dot(v)) - v, n)
}

/// Owns the session's light direction.
#[derive(Debug, Clone, PartialEq)]
pub struct LightController {
    azimuth: f64,
    elevation: f64,
    direction: DVec3,
    state: LightState,
}

impl Default for LightController {
    fn default() -> Self {
        let params = FrameParams::default();
        Self::new(params.light_azimuth, params.light_elevation)
    }
}

impl LightController {
    /// Controller with the given angles, in the Idle state.
    pub fn new(azimuth: f64, elevation: f64) -> Self {
        let mut controller = Self {
            azimuth: 0.0,
            elevation: 0.0,
            direction: DVec3::Z,
            state: LightState::Idle,
        };
        controller.set_angles(azimuth, elevation);
        controller
    }

    /// Controller with the light of a parameter snapshot.
    pub fn from_params(params: &FrameParams) -> Self {
        Self::new(params.light_azimuth, params.light_elevation)
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    /// World-space unit direction toward the light.
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    pub fn state(&self) -> LightState {
        self.state
    }

    /// Slider path: set both angles.
    ///
    /// Azimuth wraps into [-π, π]; elevation clamps to [-π/2, π/2].
    pub fn set_angles(&mut self, azimuth: f64, elevation: f64) {
        self.azimuth = wrap_angle(azimuth);
        self.elevation = elevation.clamp(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2);
        self.direction = direction_from_angles(self.azimuth, self.elevation);
    }

    /// Set the direction and re-derive the angles.
    pub fn set_direction(&mut self, direction: DVec3) {
        let d = normalize_or(direction, self.direction);
        let (azimuth, elevation) = angles_from_direction(d);
        self.azimuth = azimuth;
        self.elevation = elevation;
        self.direction = d;
    }

    /// Pointer pressed. Returns `true` if the surface was hit.
    pub fn pointer_down<S: SurfacePick + ?Sized>(
        &mut self,
        surface: &S,
        ray: &Ray,
        camera_position: DVec3,
    ) -> bool {
        if !self.recompute(surface, ray, camera_position) {
            log::debug!("pointer down missed the surface, light unchanged");
            return false;
        }
        self.state = LightState::Dragging;
        true
    }

    /// Pointer moved. Only recomputes while dragging.
    pub fn pointer_move<S: SurfacePick + ?Sized>(
        &mut self,
        surface: &S,
        ray: &Ray,
        camera_position: DVec3,
    ) -> bool {
        match self.state {
            LightState::Idle => false,
            LightState::Dragging => self.recompute(surface, ray, camera_position),
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.state = LightState::Idle;
    }

    fn recompute<S: SurfacePick + ?Sized>(
        &mut self,
        surface: &S,
        ray: &Ray,
        camera_position: DVec3,
    ) -> bool {
        let Some(hit) = surface.pick(ray) else {
            return false;
        };
        self.set_direction(mirror_light(hit.normal, hit.point, camera_position));
        log::debug!(
            "picked light at {:?}: azimuth {:.2}°, elevation {:.2}°",
            hit.point,
            self.azimuth.to_degrees(),
            self.elevation.to_degrees()
        );
        true
    }

    /// Copy of `params` carrying this controller's angles.
    pub fn apply_to(&self, params: &FrameParams) -> FrameParams {
        params.with_light_angles(self.azimuth, self.elevation)
    }
}
