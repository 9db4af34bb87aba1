//! normprobe CLI library.
//!
//! This crate provides the commands behind the `normprobe` binary: frame
//! rendering, highlight-centred export, light picking, codec surveys and
//! image comparison.

pub mod analysis;
pub mod commands;
pub mod input;
