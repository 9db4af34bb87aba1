//! Params files as the CLI reads and writes them.

use normprobe_spec::{
    canonical_params_hash, validate_params, CaptureParameters, CropLabel, DitherMode,
    EncodingMode, ErrorCode, FrameParams, NoiseMode, WarningCode,
};
use pretty_assertions::assert_eq;

#[test]
fn test_partial_file_takes_defaults() {
    let json = r#"{ "encoding": "cartesian", "bit_depth": 4.0 }"#;
    let params = FrameParams::from_json(json).unwrap();
    let expected = FrameParams::builder()
        .encoding(EncodingMode::Cartesian)
        .bit_depth(4.0)
        .build();
    assert_eq!(params, expected);
}

#[test]
fn test_unknown_field_is_rejected() {
    assert!(FrameParams::from_json(r#"{ "bitdepth": 4.0 }"#).is_err());
}

#[test]
fn test_hash_ignores_key_order() {
    let a = FrameParams::from_json(r#"{ "bit_depth": 5.0, "roughness": 0.1 }"#).unwrap();
    let b = FrameParams::from_json(r#"{ "roughness": 0.1, "bit_depth": 5.0 }"#).unwrap();
    assert_eq!(
        canonical_params_hash(&a).unwrap(),
        canonical_params_hash(&b).unwrap()
    );
    let c = FrameParams::from_json(r#"{ "roughness": 0.1, "bit_depth": 6.0 }"#).unwrap();
    assert_ne!(
        canonical_params_hash(&a).unwrap(),
        canonical_params_hash(&c).unwrap()
    );
}

#[test]
fn test_several_errors_are_collected() {
    let params = FrameParams::from_json(
        r#"{ "bit_depth": 1.0, "roughness": 0.9, "resolution": [0, 64] }"#,
    )
    .unwrap();
    let result = validate_params(&params);
    assert!(!result.is_ok());
    let codes: Vec<ErrorCode> = result.errors.iter().map(|e| e.code).collect();
    assert!(codes.contains(&ErrorCode::BitDepthOutOfRange));
    assert!(codes.contains(&ErrorCode::RoughnessOutOfRange));
    assert!(codes.contains(&ErrorCode::InvalidResolution));
}

#[test]
fn test_amplitude_without_dither_warns() {
    let params = FrameParams::builder()
        .dither(DitherMode::None)
        .noise_amplitude(1.5)
        .build();
    let result = validate_params(&params);
    assert!(result.is_ok());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.code == WarningCode::AmplitudeWithoutDither));
}

#[test]
fn test_capture_name_from_saved_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capture.json");
    FrameParams::builder()
        .encoding(EncodingMode::HemiOct)
        .dither(DitherMode::Adaptive)
        .noise(NoiseMode::Ign)
        .bit_depth(6.0)
        .roughness(0.05)
        .light(0.0, 0.0)
        .build()
        .save(&path)
        .unwrap();

    let loaded = FrameParams::from_file(&path).unwrap();
    let name = CaptureParameters::from_params(&loaded).file_name(CropLabel::Crop(331));
    assert_eq!(name, "hemioct_ajwd_ign_rect_6.00b_r0.050_a1.00_az+0_el+0_c331.png");
}
