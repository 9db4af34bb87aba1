//! Sweep command implementation
//!
//! Tabulates angular reconstruction error over bit depths for every codec.

use anyhow::Result;
use colored::Colorize;
use normprobe_core::{reconstruction_error, Codec};
use normprobe_spec::EncodingMode;
use std::process::ExitCode;

use super::emit_json;
use super::json_output::{error_codes, SweepEntry, SweepResult};

/// Bit depths used when none are given.
pub const DEFAULT_BITS: [f64; 8] = [2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 16.0];

/// Run the sweep command
///
/// # Arguments
/// * `bits` - Bit depths to evaluate (empty for [`DEFAULT_BITS`])
/// * `samples` - Hemisphere normals per cell
/// * `seed` - Sampling seed
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(bits: &[f64], samples: usize, seed: u32, json_output: bool) -> Result<ExitCode> {
    let result = sweep(bits, samples, seed);
    if json_output {
        return emit_json(Ok(result), error_codes::UNSUPPORTED_CODEC);
    }

    println!(
        "{} {} samples, seed {}",
        "Reconstruction error:".cyan().bold(),
        result.samples,
        result.seed
    );
    println!(
        "\n{:<18} {:>6} {:>12} {:>12}",
        "encoding".bold(),
        "bits".bold(),
        "mean deg".bold(),
        "max deg".bold()
    );
    let mut last = "";
    for entry in &result.entries {
        if entry.encoding != last && !last.is_empty() {
            println!();
        }
        last = &entry.encoding;
        println!(
            "{:<18} {:>6.2} {:>12.6} {:>12.6}",
            entry.encoding, entry.bits, entry.mean_degrees, entry.max_degrees
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Every encoding except ground truth, at every requested depth.
pub fn sweep(bits: &[f64], samples: usize, seed: u32) -> SweepResult {
    let bits: Vec<f64> = if bits.is_empty() {
        DEFAULT_BITS.to_vec()
    } else {
        bits.to_vec()
    };

    let mut entries = Vec::new();
    for &mode in EncodingMode::all() {
        let Some((codec, rounding)) = Codec::for_mode(mode) else {
            continue;
        };
        for &b in &bits {
            let err = reconstruction_error(&codec, rounding, b, samples, seed);
            entries.push(SweepEntry {
                encoding: mode.as_str().to_string(),
                bits: b,
                mean_degrees: err.mean_degrees,
                max_degrees: err.max_degrees,
            });
        }
    }

    SweepResult {
        samples,
        seed,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_skips_ground_truth() {
        let result = sweep(&[4.0, 8.0], 200, 1);
        assert_eq!(result.entries.len(), 3 * 2);
        assert!(result.entries.iter().all(|e| e.encoding != "ground_truth"));
    }

    #[test]
    fn test_sweep_defaults_bits() {
        let result = sweep(&[], 10, 1);
        assert_eq!(result.entries.len(), 3 * DEFAULT_BITS.len());
    }

    #[test]
    fn test_hemi_oct_row_beats_cartesian() {
        let result = sweep(&[6.0], 2000, 4);
        let find = |name: &str| {
            result
                .entries
                .iter()
                .find(|e| e.encoding == name)
                .unwrap()
                .mean_degrees
        };
        assert!(find("hemi_oct") < find("cartesian"));
        assert!(find("cartesian") < find("cartesian_floor"));
    }

    #[test]
    fn test_sweep_is_deterministic() {
        assert_eq!(sweep(&[5.0], 300, 9).entries, sweep(&[5.0], 300, 9).entries);
    }
}
