//! Unit-normal codecs.
//!
//! A codec maps a front-hemisphere unit normal to a lattice coordinate in
//! [0, 1]², which is then snapped to the `2^bits - 1` grid by a
//! [`Quantizer`]. Decoding maps a (possibly quantized) lattice coordinate back
//! to a unit normal.
//!
//! Every codec also reports its distortion `J`: the area of the image of a
//! unit parameter cell on the sphere, measured with respect to the signed
//! coordinates `s = 2q - 1`. Large `J` means one lattice step spans a large
//! angle there.

mod cartesian;
mod hemi_oct;
mod quantize;

pub use cartesian::CartesianCodec;
pub use hemi_oct::HemiOctCodec;
pub use quantize::{levels_for_bits, Quantizer, Rounding};

use glam::{DVec2, DVec3};
use normprobe_spec::EncodingMode;

/// Lower bound for the L1 denominator when projecting onto the octahedron.
pub const L1_FLOOR: f64 = 1e-8;

/// Vectors shorter than this normalize to the fallback instead.
const NORMALIZE_EPSILON: f64 = 1e-12;

/// A reversible mapping between unit normals and [0, 1]² lattice space.
pub trait NormalCodec {
    /// Project a unit normal to an unquantized lattice coordinate.
    fn to_lattice(&self, n: DVec3) -> DVec2;

    /// Reconstruct a unit normal from a lattice coordinate.
    fn from_lattice(&self, q: DVec2) -> DVec3;

    /// Local area distortion `|∂n/∂s × ∂n/∂t|` at a lattice coordinate.
    fn distortion(&self, q: DVec2) -> f64;

    /// Project and quantize.
    fn encode(&self, n: DVec3, quantizer: &Quantizer) -> DVec2 {
        quantizer.quantize(self.to_lattice(n))
    }

    /// Quantize then decode in one go.
    fn round_trip(&self, n: DVec3, quantizer: &Quantizer) -> DVec3 {
        self.from_lattice(self.encode(n, quantizer))
    }
}

/// Runtime-selected codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Cartesian(CartesianCodec),
    HemiOct(HemiOctCodec),
}

impl Codec {
    /// Codec and rounding for an encoding mode.
    ///
    /// Returns `None` for ground truth, which bypasses encoding entirely.
    pub fn for_mode(mode: EncodingMode) -> Option<(Codec, Rounding)> {
        match mode {
            EncodingMode::GroundTruth => None,
            EncodingMode::Cartesian => Some((Codec::Cartesian(CartesianCodec), Rounding::Nearest)),
            EncodingMode::CartesianFloor => {
                Some((Codec::Cartesian(CartesianCodec), Rounding::Floor))
            }
            EncodingMode::HemiOct => Some((Codec::HemiOct(HemiOctCodec), Rounding::Nearest)),
        }
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            Codec::Cartesian(_) => "cartesian",
            Codec::HemiOct(_) => "hemi-oct",
        }
    }
}

impl NormalCodec for Codec {
    fn to_lattice(&self, n: DVec3) -> DVec2 {
        match self {
            Codec::Cartesian(c) => c.to_lattice(n),
            Codec::HemiOct(c) => c.to_lattice(n),
        }
    }

    fn from_lattice(&self, q: DVec2) -> DVec3 {
        match self {
            Codec::Cartesian(c) => c.from_lattice(q),
            Codec::HemiOct(c) => c.from_lattice(q),
        }
    }

    fn distortion(&self, q: DVec2) -> f64 {
        match self {
            Codec::Cartesian(c) => c.distortion(q),
            Codec::HemiOct(c) => c.distortion(q),
        }
    }
}

/// Normalize `v`, or return `fallback` for a (near) zero vector.
#[inline]
pub fn normalize_or(v: DVec3, fallback: DVec3) -> DVec3 {
    let len = v.length();
    if len > NORMALIZE_EPSILON && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

/// Area spanned on the sphere by the tangent vectors of `p / |p|`.
///
/// `dp_ds` and `dp_dt` are derivatives of the unnormalized point `p`; the
/// derivative of the normalization is `(dp - n (n · dp)) / |p|`.
pub(crate) fn normalized_area(p: DVec3, dp_ds: DVec3, dp_dt: DVec3) -> f64 {
    let len = p.length();
    if len <= NORMALIZE_EPSILON {
        return 0.0;
    }
    let n = p / len;
    let dn_ds = (dp_ds - n * n.dot(dp_ds)) / len;
    let dn_dt = (dp_dt - n * n.dot(dp_dt)) / len;
    dn_ds.cross(dn_dt).length()
}
