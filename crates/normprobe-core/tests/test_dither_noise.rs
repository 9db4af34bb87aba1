//! Dither and noise behaviour seen from outside the crate.

use glam::{DVec2, DVec3};
use normprobe_core::codec::{CartesianCodec, Codec, HemiOctCodec, NormalCodec, Quantizer, Rounding};
use normprobe_core::dither::{ajwd_weight, DitherEngine, AMPLIFICATION_CAP, JACOBIAN_FLOOR};
use normprobe_core::noise::{BlueNoiseTile, InterleavedGradient, NoiseField, NoiseSource};
use normprobe_core::rng::DeterministicRng;
use normprobe_spec::{DitherMode, Distribution, FrameParams, NoiseMode};

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_pixel_same_noise() {
    let params = FrameParams::builder()
        .noise(NoiseMode::BlueNoise)
        .noise_tile(42, 16)
        .build();
    let first = NoiseField::from_params(&params).unwrap();
    let second = NoiseField::from_params(&params).unwrap();
    let ign = InterleavedGradient;

    for y in 0..40 {
        for x in 0..40 {
            assert_eq!(first.taps(x, y), first.taps(x, y));
            assert_eq!(first.taps(x, y), second.taps(x, y));
            assert_eq!(ign.taps(x, y), ign.taps(x, y));
        }
    }
}

#[test]
fn test_dithered_encode_is_repeatable() {
    let engine = DitherEngine::new(DitherMode::Adaptive, Distribution::Triangular, 1.0);
    let codec = Codec::HemiOct(HemiOctCodec);
    let q = Quantizer::new(5.0, Rounding::Nearest);
    let tile = BlueNoiseTile::generate(16, 8).unwrap();
    let n = DVec3::new(0.2, -0.4, 0.9).normalize();

    for x in 0..16 {
        let a = engine.encode(&codec, n, &q, &tile, [x, 3]);
        let b = engine.encode(&codec, n, &q, &tile, [x, 3]);
        assert_eq!(a, b);
    }
}

#[test]
fn test_dither_varies_across_pixels() {
    let engine = DitherEngine::new(DitherMode::Uniform, Distribution::Rectangular, 1.0);
    let codec = CartesianCodec;
    let q = Quantizer::new(4.0, Rounding::Nearest);
    // Halfway between two lattice levels so the dither decides.
    let lattice = DVec2::splat(7.5 / q.levels());
    let n = codec.from_lattice(lattice);

    let outputs: std::collections::HashSet<[u64; 3]> = (0..64)
        .map(|x| {
            let m = engine.encode(&codec, n, &q, &InterleavedGradient, [x, 0]);
            [m.x.to_bits(), m.y.to_bits(), m.z.to_bits()]
        })
        .collect();
    assert!(outputs.len() > 1);
}

// ============================================================================
// AJWD Bounds
// ============================================================================

#[test]
fn test_ajwd_factor_never_exceeds_cap() {
    let mut rng = DeterministicRng::new(17);
    let engine = DitherEngine::new(DitherMode::Adaptive, Distribution::Rectangular, 1.0);
    for codec in [Codec::Cartesian(CartesianCodec), Codec::HemiOct(HemiOctCodec)] {
        for _ in 0..2000 {
            let n = rng.unit_hemisphere();
            let w = engine.weight(&codec, codec.to_lattice(n));
            assert!(w >= 0.0 && w <= AMPLIFICATION_CAP, "{} weight {}", codec.name(), w);
        }
    }
    for j in [0.0, 1e-300, JACOBIAN_FLOOR / 2.0, f64::MIN_POSITIVE] {
        assert_eq!(ajwd_weight(j), AMPLIFICATION_CAP);
    }
}

#[test]
fn test_ajwd_offset_bounded_by_cap_steps() {
    let engine = DitherEngine::new(DitherMode::Adaptive, Distribution::Triangular, 2.0);
    let codec = Codec::Cartesian(CartesianCodec);
    for bits in [2.0, 4.0, 8.0, 16.0] {
        let q = Quantizer::new(bits, Rounding::Nearest);
        let bound = AMPLIFICATION_CAP * 2.0 * q.step();
        for x in 0..128 {
            // Near the rim, where the Cartesian Jacobian blows up.
            let lattice = DVec2::new(0.5 + 0.499 * (x as f64 / 128.0), 0.5);
            let taps = InterleavedGradient.taps(x, 1);
            let d = engine.offset(&codec, lattice, &q, taps);
            assert!(d.x.abs() < bound && d.y.abs() < bound);
        }
    }
}

#[test]
fn test_adaptive_amplifies_where_hemi_oct_compresses() {
    let engine = DitherEngine::new(DitherMode::Adaptive, Distribution::Rectangular, 1.0);
    let codec = HemiOctCodec;
    // J = 0.5 at the pole, larger toward the corners.
    let pole = engine.weight(&codec, DVec2::new(0.5 + 1e-9, 0.5 + 1e-9));
    assert!((pole - 2f64.sqrt()).abs() < 1e-6);
    let corner = engine.weight(&codec, DVec2::new(0.999, 0.6));
    assert!(corner < pole);
}
