//! Error types for plreplay

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using plreplay's Error
pub type Result<T> = std::result::Result<T, Error>;

/// plreplay error types
///
/// Only the outer layers (file loading, config, export, CLI) produce these.
/// The reconstruction engine never fails; it records diagnostics instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Trace file not found: {path}")]
    TraceNotFound { path: PathBuf },

    #[error("Trace is empty: {path}")]
    EmptyTrace { path: PathBuf },

    #[error("Snapshot {index} out of range (trace has {total} snapshots)")]
    SnapshotOutOfRange { index: usize, total: usize },

    #[error("Line {line} out of range (trace has {total} lines)")]
    LineOutOfRange { line: usize, total: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Export error: {message}")]
    ExportError { message: String },

    #[error("Trace check failed: {message}")]
    CheckFailed { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
