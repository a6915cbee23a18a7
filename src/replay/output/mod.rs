//! Output formatters for replay results
//!
//! Provides multiple renderings of snapshots, steps and check reports:
//! - ASCII: Tree drawing with ANSI colors (terminal)
//! - Plain: Indented text without colors (piping/logs)
//! - JSON: Machine-readable format (tooling integration)
//! - DOT: Graph visualization format, colored by truth state
//!
//! @module replay/output

pub mod ascii;
pub mod json;
pub mod plain;

use std::borrow::Cow;

use serde::Serialize;

use super::builder::{BuildStats, Reconstruction};
use super::diagnostics::Diagnostic;
use super::player::Step;
use super::recorder::{LineRange, Snapshot, Termination};
use super::tree::Truth;
use crate::core::config::OutputConfig;

// =============================================================================
// TYPES
// =============================================================================

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tree drawing with colors
    #[default]
    Ascii,
    /// Plain text without ANSI codes
    Plain,
    /// JSON for machine consumption
    Json,
    /// DOT for graph visualization
    Dot,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Ascii => "ascii",
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
            OutputFormat::Dot => "dot",
        }
    }

    /// File extension used when exporting in this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Dot => "dot",
            OutputFormat::Ascii | OutputFormat::Plain => "txt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Ok(OutputFormat::Ascii),
            "plain" | "text" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            "dot" => Ok(OutputFormat::Dot),
            other => Err(format!(
                "unknown output format '{}' (expected ascii, plain, json or dot)",
                other
            )),
        }
    }
}

/// Rendering knobs shared by all formatters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// ANSI colors in ascii output
    pub color: bool,
    /// Labels longer than this are elided in text output (0 = never)
    pub max_label_width: usize,
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::from(&OutputConfig::default())
    }
}

impl From<&OutputConfig> for FormatOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            color: config.color,
            max_label_width: config.max_label_width,
            pretty: true,
        }
    }
}

/// One row of a snapshot listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub index: usize,
    pub range: LineRange,
    pub termination: Termination,
    /// Frames below the root
    pub calls: usize,
    pub height: usize,
    /// Truth of the first top-level call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Truth>,
}

impl From<&Snapshot> for SnapshotSummary {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            index: snapshot.index,
            range: snapshot.range,
            termination: snapshot.termination,
            calls: snapshot.call_count(),
            height: snapshot.tree.height(),
            outcome: snapshot.tree.first_call_truth(),
        }
    }
}

/// Diagnostics and counters of one reconstruction
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub source: String,
    pub snapshots: usize,
    pub lossy: bool,
    pub stats: BuildStats,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn new(source: impl Into<String>, reconstruction: &Reconstruction) -> Self {
        Self {
            source: source.into(),
            snapshots: reconstruction.snapshots.len(),
            lossy: reconstruction.is_lossy(),
            stats: reconstruction.stats,
            diagnostics: reconstruction.diagnostics.clone(),
        }
    }
}

// =============================================================================
// FORMATTER TRAIT
// =============================================================================

/// Trait for formatting replay output
pub trait ReplayFormatter {
    /// Format one snapshot tree with its provenance
    fn format_snapshot(&self, snapshot: &Snapshot) -> String;

    /// Format a summary row per snapshot
    fn format_listing(&self, snapshots: &[Snapshot]) -> String;

    /// Format the tree state after a single line
    fn format_step(&self, step: &Step) -> String;

    /// Format diagnostics of a run
    fn format_check(&self, report: &CheckReport) -> String;
}

// =============================================================================
// FACTORY FUNCTION
// =============================================================================

/// Create a formatter for the given output format
pub fn create_formatter(format: OutputFormat, options: FormatOptions) -> Box<dyn ReplayFormatter> {
    match format {
        OutputFormat::Ascii => Box::new(ascii::AsciiFormatter::new(options)),
        OutputFormat::Plain => Box::new(plain::PlainFormatter::new(options)),
        OutputFormat::Json if options.pretty => Box::new(json::JsonFormatter::new()),
        OutputFormat::Json => Box::new(json::JsonFormatter::compact()),
        OutputFormat::Dot => Box::new(plain::DotFormatter::new()),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Shorten `label` to at most `max` characters, marking the cut with `...`
pub fn elide(label: &str, max: usize) -> Cow<'_, str> {
    if max == 0 || label.chars().count() <= max {
        return Cow::Borrowed(label);
    }
    if max <= 3 {
        return Cow::Owned(".".repeat(max));
    }
    let kept: String = label.chars().take(max - 3).collect();
    Cow::Owned(format!("{}...", kept))
}

/// Short marker for a truth value
pub fn truth_marker(truth: Truth) -> &'static str {
    match truth {
        Truth::Succeeded => "✓",
        Truth::Failed => "✗",
        Truth::Unknown => "?",
    }
}

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use ascii::AsciiFormatter;
pub use json::JsonFormatter;
pub use plain::{DotFormatter, PlainFormatter};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::builder::rebuild;

    #[test]
    fn test_parse_output_format() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(" DOT ".parse::<OutputFormat>(), Ok(OutputFormat::Dot));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Plain));
        assert!("svg".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "ascii");
    }

    #[test]
    fn test_elide() {
        assert_eq!(elide("member(X,Y)", 0), "member(X,Y)");
        assert_eq!(elide("member(X,Y)", 11), "member(X,Y)");
        assert_eq!(elide("member(X,Y)", 8), "membe...");
        assert_eq!(elide("member(X,Y)", 2), "..");
    }

    #[test]
    fn test_summary_from_snapshot() {
        let result = rebuild("call: p\nfail: p\nredo: p\nexit: p");
        let summary = SnapshotSummary::from(&result.snapshots[0]);
        assert_eq!(summary.index, 0);
        assert_eq!(summary.calls, 2);
        assert_eq!(summary.height, 2);
        assert_eq!(summary.outcome, Some(Truth::Failed));
        assert_eq!(summary.termination, Termination::Redo { line: 2 });
    }

    #[test]
    fn test_check_report() {
        let result = rebuild("call: p\n???\nexit: p");
        let report = CheckReport::new("t.txt", &result);
        assert!(report.lossy);
        assert_eq!(report.snapshots, 1);
        assert_eq!(report.diagnostics.len(), 1);
    }
}
