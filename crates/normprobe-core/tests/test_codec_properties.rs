//! Codec properties over the front hemisphere.
//!
//! Covers unit-length decodes, error monotonicity in bit depth, the
//! hemi-octahedral versus Cartesian ordering and the legacy floor variant.

use glam::DVec3;
use normprobe_core::analysis::reconstruction_error;
use normprobe_core::codec::{CartesianCodec, Codec, HemiOctCodec, NormalCodec, Quantizer, Rounding};
use normprobe_core::rng::DeterministicRng;
use normprobe_spec::EncodingMode;

const BIT_DEPTHS: [f64; 4] = [2.0, 4.0, 8.0, 16.0];

fn codecs() -> [Codec; 2] {
    [Codec::Cartesian(CartesianCodec), Codec::HemiOct(HemiOctCodec)]
}

fn hemisphere_samples(count: usize, seed: u32) -> Vec<DVec3> {
    let mut rng = DeterministicRng::new(seed);
    (0..count).map(|_| rng.unit_hemisphere()).collect()
}

// ============================================================================
// Unit Length
// ============================================================================

#[test]
fn test_decoded_normals_are_unit_length() {
    let samples = hemisphere_samples(2000, 11);
    for codec in codecs() {
        for bits in BIT_DEPTHS {
            let q = Quantizer::new(bits, Rounding::Nearest);
            for &n in &samples {
                let out = codec.round_trip(n, &q);
                assert!(
                    (out.length() - 1.0).abs() < 1e-9,
                    "{} at {} bits: |decode(encode({:?}))| = {}",
                    codec.name(),
                    bits,
                    n,
                    out.length()
                );
                assert!(out.z >= 0.0);
            }
        }
    }
}

#[test]
fn test_horizon_and_pole_are_finite() {
    let special = [
        DVec3::Z,
        DVec3::X,
        DVec3::Y,
        -DVec3::X,
        DVec3::new(1.0, 1.0, 0.0).normalize(),
        DVec3::new(-1.0, 1.0, 1e-9).normalize(),
    ];
    for codec in codecs() {
        for bits in BIT_DEPTHS {
            let q = Quantizer::new(bits, Rounding::Nearest);
            for &n in &special {
                let out = codec.round_trip(n, &q);
                assert!(out.is_finite(), "{} produced {:?} for {:?}", codec.name(), out, n);
                assert!(codec.distortion(codec.encode(n, &q)).is_finite());
            }
        }
    }
}

// ============================================================================
// Monotonicity
// ============================================================================

#[test]
fn test_mean_error_decreases_with_bit_depth() {
    for codec in codecs() {
        let mut last = f64::INFINITY;
        for bits in BIT_DEPTHS {
            let err = reconstruction_error(&codec, Rounding::Nearest, bits, 4000, 5);
            assert!(
                err.mean_degrees <= last,
                "{}: mean error rose to {} at {} bits",
                codec.name(),
                err.mean_degrees,
                bits
            );
            last = err.mean_degrees;
        }
    }
}

#[test]
fn test_max_error_decreases_with_bit_depth() {
    for codec in codecs() {
        let mut last = f64::INFINITY;
        for bits in BIT_DEPTHS {
            let err = reconstruction_error(&codec, Rounding::Nearest, bits, 4000, 6);
            assert!(err.max_degrees <= last, "{} at {} bits", codec.name(), bits);
            last = err.max_degrees;
        }
    }
}

// ============================================================================
// Codec Ordering
// ============================================================================

#[test]
fn test_hemi_oct_beats_cartesian_on_average() {
    for bits in [2.0, 3.0, 4.0, 6.0, 8.0, 12.0, 16.0] {
        let cart = reconstruction_error(&CartesianCodec, Rounding::Nearest, bits, 5000, 1);
        let ho = reconstruction_error(&HemiOctCodec, Rounding::Nearest, bits, 5000, 1);
        assert!(
            ho.mean_degrees <= cart.mean_degrees,
            "{} bits: hemi-oct {} > cartesian {}",
            bits,
            ho.mean_degrees,
            cart.mean_degrees
        );
    }
}

#[test]
fn test_hemi_oct_max_error_is_tighter() {
    let cart = reconstruction_error(&CartesianCodec, Rounding::Nearest, 8.0, 5000, 2);
    let ho = reconstruction_error(&HemiOctCodec, Rounding::Nearest, 8.0, 5000, 2);
    assert!(ho.max_degrees < cart.max_degrees);
}

// ============================================================================
// Legacy Floor Rounding
// ============================================================================

#[test]
fn test_floor_variant_is_biased() {
    let (codec, rounding) = Codec::for_mode(EncodingMode::CartesianFloor).unwrap();
    assert_eq!(rounding, Rounding::Floor);

    let floor = reconstruction_error(&codec, Rounding::Floor, 6.0, 3000, 9);
    let nearest = reconstruction_error(&codec, Rounding::Nearest, 6.0, 3000, 9);
    assert!(floor.mean_degrees > nearest.mean_degrees);
}

#[test]
fn test_floor_never_rounds_up() {
    let q = Quantizer::new(8.0, Rounding::Floor);
    let codec = CartesianCodec;
    for &n in &hemisphere_samples(500, 31) {
        let raw = codec.to_lattice(n);
        let snapped = codec.encode(n, &q);
        assert!(snapped.x <= raw.x + 1e-15);
        assert!(snapped.y <= raw.y + 1e-15);
    }
}
