//! Blinn-Phong specular response used as the error instrument.
//!
//! Ground truth and every encoded candidate go through the same function, so
//! their difference isolates the encoding error.

use glam::DVec3;

use crate::codec::normalize_or;

/// Added to `roughness⁴` so the exponent stays finite at zero roughness.
pub const SHININESS_EPSILON: f64 = 1e-3;

/// Blinn-Phong exponent for a roughness value.
#[inline]
pub fn shininess(roughness: f64) -> f64 {
    2.0 / (roughness.powi(4) + SHININESS_EPSILON) - 2.0
}

/// Normalized half vector of light and view; falls back to `n` if they cancel.
#[inline]
pub fn half_vector(light: DVec3, view: DVec3, fallback: DVec3) -> DVec3 {
    normalize_or(light + view, fallback)
}

/// Scalar specular intensity `max(N·H, 0)^shininess`.
pub fn specular_response(normal: DVec3, view: DVec3, light: DVec3, roughness: f64) -> f64 {
    let h = half_vector(light, view, normal);
    let n_dot_h = normal.dot(h).max(0.0);
    n_dot_h.powf(shininess(roughness))
}
