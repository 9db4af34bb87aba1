//! Validate command implementation
//!
//! Checks a params file against the control ranges.

use anyhow::{Context, Result};
use colored::Colorize;
use normprobe_spec::{canonical_params_hash, validate_params, FrameParams, ValidationResult};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{error_codes, CommandOutput, JsonError, JsonWarning, ValidateResult};

/// Run the validate command
///
/// # Arguments
/// * `params_path` - Path to the params file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(params_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(params_path)
    } else {
        run_human(params_path)
    }
}

fn run_human(params_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), params_path);

    let params = FrameParams::from_file(Path::new(params_path))
        .with_context(|| format!("Failed to load params file: {}", params_path))?;
    let result = validate_params(&params);
    print_diagnostics(&result);

    if result.is_ok() {
        let hash = canonical_params_hash(&params)?;
        println!("{} {}", "Params hash:".dimmed(), &hash[..16]);
        println!("\n{}", "Params are valid.".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} {} error(s)",
            "Validation failed:".red().bold(),
            result.errors.len()
        );
        Ok(ExitCode::from(1))
    }
}

fn print_diagnostics(result: &ValidationResult) {
    for error in &result.errors {
        let path = error
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "x".red(),
            error.code,
            path.dimmed(),
            error.message
        );
    }
    for warning in &result.warnings {
        let path = warning
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "!".yellow(),
            warning.code,
            path.dimmed(),
            warning.message
        );
    }
}

fn run_json(params_path: &str) -> Result<ExitCode> {
    let output = validate_json(params_path);
    let exit = if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(exit)
}

/// Validation diagnostics as a JSON envelope.
pub fn validate_json(params_path: &str) -> CommandOutput<ValidateResult> {
    let params = match FrameParams::from_file(Path::new(params_path)) {
        Ok(p) => p,
        Err(e) => {
            let error =
                JsonError::new(error_codes::FILE_READ, e.to_string()).with_file(params_path);
            return CommandOutput::failure(vec![error]);
        }
    };

    let result = validate_params(&params);
    let warnings = result.warnings.iter().map(JsonWarning::from).collect();
    if !result.is_ok() {
        let errors = result.errors.iter().map(JsonError::from).collect();
        return CommandOutput::failure(errors).with_warnings(warnings);
    }

    match canonical_params_hash(&params) {
        Ok(params_hash) => {
            CommandOutput::success(ValidateResult { params_hash }).with_warnings(warnings)
        }
        Err(e) => {
            let error = JsonError::new(error_codes::INVALID_PARAMS, e.to_string());
            CommandOutput::failure(vec![error])
        }
    }
}
