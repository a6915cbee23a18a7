//! Trace Loading and Snapshot Export
//!
//! Reads trace files from disk and writes snapshots out as one file each
//! plus a `manifest.json` describing the run.
//!
//! Export layout:
//! ```text
//! <dir>/snapshot_000.json   (or .dot)
//! <dir>/snapshot_001.json
//! <dir>/manifest.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::builder::{BuildStats, Reconstruction};
use super::output::{create_formatter, FormatOptions, OutputFormat};
use super::recorder::{LineRange, Termination};
use crate::core::error::{Error, Result};

/// Name of the manifest written next to exported snapshots
pub const MANIFEST_FILE: &str = "manifest.json";

// =============================================================================
// TYPES
// =============================================================================

/// What to export and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// `Json` or `Dot`
    pub format: OutputFormat,
    /// Pretty-print JSON files
    pub pretty: bool,
    /// Only snapshots whose first top-level call succeeded
    pub successful_only: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
            successful_only: false,
        }
    }
}

/// One written snapshot file
#[derive(Debug, Clone, Serialize)]
pub struct ExportedSnapshot {
    pub index: usize,
    pub file: String,
    pub range: LineRange,
    pub termination: Termination,
    pub successful: bool,
}

/// Summary written to `manifest.json`
#[derive(Debug, Clone, Serialize)]
pub struct ExportManifest {
    /// When the export ran
    pub created_at: DateTime<Utc>,
    /// Trace the snapshots came from
    pub source: String,
    pub format: String,
    pub successful_only: bool,
    pub stats: BuildStats,
    /// Snapshots in the reconstruction, exported or not
    pub total_snapshots: usize,
    pub snapshots: Vec<ExportedSnapshot>,
}

// =============================================================================
// LOADING
// =============================================================================

/// Read a trace file into memory.
///
/// A file holding nothing but whitespace is rejected.
pub fn load_trace(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::TraceNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Err(Error::EmptyTrace {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), bytes = text.len(), "Loaded trace");
    Ok(text)
}

// =============================================================================
// EXPORT
// =============================================================================

/// File name for a snapshot in the given format
pub fn snapshot_file_name(index: usize, format: OutputFormat) -> String {
    format!("snapshot_{:03}.{}", index, format.extension())
}

/// Write snapshots of `reconstruction` into `dir` and return the manifest.
///
/// `dir` is created when missing. Existing snapshot files with the same
/// names are overwritten.
pub fn export_snapshots(
    reconstruction: &Reconstruction,
    source: &str,
    dir: &Path,
    options: ExportOptions,
) -> Result<ExportManifest> {
    if !matches!(options.format, OutputFormat::Json | OutputFormat::Dot) {
        return Err(Error::ExportError {
            message: format!("cannot export snapshots as {}", options.format),
        });
    }

    fs::create_dir_all(dir)?;

    let formatter = create_formatter(
        options.format,
        FormatOptions {
            pretty: options.pretty,
            ..FormatOptions::default()
        },
    );

    let mut exported = Vec::new();
    for snapshot in &reconstruction.snapshots {
        let successful = snapshot.tree.is_successful();
        if options.successful_only && !successful {
            continue;
        }

        let file = snapshot_file_name(snapshot.index, options.format);
        let mut body = formatter.format_snapshot(snapshot);
        if !body.ends_with('\n') {
            body.push('\n');
        }
        fs::write(dir.join(&file), body)?;

        exported.push(ExportedSnapshot {
            index: snapshot.index,
            file,
            range: snapshot.range,
            termination: snapshot.termination,
            successful,
        });
    }

    let manifest = ExportManifest {
        created_at: Utc::now(),
        source: source.to_string(),
        format: options.format.to_string(),
        successful_only: options.successful_only,
        stats: reconstruction.stats,
        total_snapshots: reconstruction.snapshots.len(),
        snapshots: exported,
    };

    let manifest_path = manifest_path(dir);
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

    info!(
        dir = %dir.display(),
        written = manifest.snapshots.len(),
        total = manifest.total_snapshots,
        "Exported snapshots"
    );
    Ok(manifest)
}

/// Path of the manifest inside an export directory
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILE)
}
