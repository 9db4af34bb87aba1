//! Hemispherical octahedral encoding.
//!
//! The front hemisphere is projected onto the L1 unit octahedron, the upper
//! pyramid is flattened to a diamond and the diamond is rotated 45 degrees to
//! fill the square. Lattice cells cover much more even solid angle than the
//! Cartesian projection, especially near the pole.

use glam::{DVec2, DVec3};

use super::{normalize_or, normalized_area, NormalCodec, L1_FLOOR};

/// Hemi-octahedral codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HemiOctCodec;

/// Sign with `sign(0) = +1`.
///
/// The decode map is not differentiable on the fold lines `x = 0` and
/// `y = 0`; this picks the positive side there.
#[inline]
fn fold_sign(v: f64) -> f64 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

impl HemiOctCodec {
    /// Point on the L1 octahedron for signed octahedral coordinates.
    #[inline]
    fn octahedron_point(uv: DVec2) -> DVec3 {
        let x = (uv.x + uv.y) * 0.5;
        let y = (uv.x - uv.y) * 0.5;
        DVec3::new(x, y, 1.0 - x.abs() - y.abs())
    }

    /// Octahedral `(u, v)` in [-1, 1] for a front-hemisphere unit normal.
    pub fn octahedral_coords(n: DVec3) -> DVec2 {
        // Inputs are assumed front-facing; the floor keeps a vector near the
        // back pole from dividing by zero.
        let l1 = (n.x.abs() + n.y.abs() + n.z).max(L1_FLOOR);
        let px = n.x / l1;
        let py = n.y / l1;
        DVec2::new(px + py, px - py)
    }
}

impl NormalCodec for HemiOctCodec {
    fn to_lattice(&self, n: DVec3) -> DVec2 {
        Self::octahedral_coords(n) * 0.5 + 0.5
    }

    fn from_lattice(&self, q: DVec2) -> DVec3 {
        let uv = q * 2.0 - 1.0;
        normalize_or(Self::octahedron_point(uv), DVec3::Z)
    }

    fn distortion(&self, q: DVec2) -> f64 {
        let uv = q * 2.0 - 1.0;
        let p = Self::octahedron_point(uv);
        let sx = fold_sign(p.x);
        let sy = fold_sign(p.y);
        // d/du (x, y, 1 - |x| - |y|) with x = (u+v)/2, y = (u-v)/2
        let dp_du = DVec3::new(0.5, 0.5, -0.5 * (sx + sy));
        let dp_dv = DVec3::new(0.5, -0.5, -0.5 * (sx - sy));
        normalized_area(p, dp_du, dp_dv)
    }
}
