//! CLI command implementations

pub mod compare;
pub mod distortion;
pub mod export;
pub mod json_output;
pub mod pick;
pub mod render;
pub mod sweep;
pub mod validate;

use anyhow::Result;
use serde::Serialize;
use std::process::ExitCode;

use crate::input::InvalidParams;
use json_output::{CommandOutput, JsonError};

/// Print a command's JSON envelope: the payload on success, the error
/// chain under `code` on failure.
///
/// Rejected params report each validator error under its own `E0xx` code.
pub(crate) fn emit_json<T: Serialize>(outcome: Result<T>, code: &str) -> Result<ExitCode> {
    let (output, exit) = match outcome {
        Ok(result) => (CommandOutput::success(result), ExitCode::SUCCESS),
        Err(e) => (CommandOutput::failure(json_errors(&e, code)), ExitCode::from(1)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(exit)
}

fn json_errors(err: &anyhow::Error, code: &str) -> Vec<JsonError> {
    match err.downcast_ref::<InvalidParams>() {
        Some(invalid) => invalid.errors.iter().map(JsonError::from).collect(),
        None => vec![JsonError::new(code, format!("{:#}", err))],
    }
}
