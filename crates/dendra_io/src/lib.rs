//! # Dendra IO
//!
//! Output layer for dendra runs.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - SWC morphology export, parsing and validation
//! - JSON snapshots of the arbor
//! - The `run.json` manifest written next to exported files

/// Error types and result aliases for I/O operations
pub mod error;
/// Run manifest describing an export
pub mod manifest;
/// JSON helpers
pub mod serialization;
/// SWC export, parsing and validation
pub mod swc;

pub use error::{IoError, Result};
pub use manifest::{RunManifest, MANIFEST_FILE};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
pub use swc::{
    export_all, export_soma, parse_swc, render, validate_records, write_soma_file, LabelCounter,
    SwcKind, SwcRecord,
};
