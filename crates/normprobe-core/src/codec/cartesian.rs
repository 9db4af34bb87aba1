//! Two-channel XY encoding with reconstructed Z.

use glam::{DVec2, DVec3};

use super::{normalize_or, normalized_area, NormalCodec};

/// Stores `n.xy` remapped to [0, 1]; Z is rebuilt as `sqrt(1 - x² - y²)`.
///
/// Decoded normals always have `z >= 0`, so back-facing normals cannot be
/// represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartesianCodec;

impl CartesianCodec {
    /// Unnormalized reconstruction from signed coordinates in [-1, 1].
    #[inline]
    fn reconstruct(s: DVec2) -> DVec3 {
        let z = (1.0 - s.x * s.x - s.y * s.y).max(0.0).sqrt();
        DVec3::new(s.x, s.y, z)
    }
}

impl NormalCodec for CartesianCodec {
    fn to_lattice(&self, n: DVec3) -> DVec2 {
        DVec2::new(n.x, n.y) * 0.5 + 0.5
    }

    fn from_lattice(&self, q: DVec2) -> DVec3 {
        let s = q * 2.0 - 1.0;
        normalize_or(Self::reconstruct(s), DVec3::Z)
    }

    fn distortion(&self, q: DVec2) -> f64 {
        let s = q * 2.0 - 1.0;
        let p = Self::reconstruct(s);
        // Outside the unit disc z is clamped to 0 and the decode collapses
        // onto the horizon circle: dz vanishes and the area goes to zero.
        let (dz_dx, dz_dy) = if p.z > 0.0 {
            (-s.x / p.z, -s.y / p.z)
        } else {
            (0.0, 0.0)
        };
        normalized_area(
            p,
            DVec3::new(1.0, 0.0, dz_dx),
            DVec3::new(0.0, 1.0, dz_dy),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pole_maps_to_lattice_centre() {
        let codec = CartesianCodec;
        assert_eq!(codec.to_lattice(DVec3::Z), DVec2::splat(0.5));
        assert_eq!(codec.from_lattice(DVec2::splat(0.5)), DVec3::Z);
    }

    #[test]
    fn test_outside_disc_is_clamped_not_nan() {
        let codec = CartesianCodec;
        let n = codec.from_lattice(DVec2::new(1.0, 1.0));
        assert!(n.is_finite());
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert_eq!(n.z, 0.0);
    }

    #[test]
    fn test_distortion_is_inverse_z_inside_disc() {
        let codec = CartesianCodec;
        for &(x, y) in &[(0.0, 0.0), (0.3, -0.2), (-0.6, 0.5)] {
            let q = DVec2::new(x, y) * 0.5 + 0.5;
            let z = (1.0f64 - x * x - y * y).sqrt();
            let j = codec.distortion(q);
            assert!((j - 1.0 / z).abs() < 1e-9, "J = {} at ({}, {})", j, x, y);
        }
    }

    #[test]
    fn test_distortion_zero_outside_disc() {
        let codec = CartesianCodec;
        assert!(codec.distortion(DVec2::new(1.0, 1.0)).abs() < 1e-12);
    }
}
