//! JSON output formatter
//!
//! Provides machine-readable JSON output for:
//! - Tooling integration
//! - Graph viewers fed from exported snapshots
//! - Scripting and automation
//!
//! Tree nodes carry `label`, `truth` and `depth`; `children` is present only
//! when non-empty.
//!
//! @module replay/output/json

use super::{CheckReport, ReplayFormatter, SnapshotSummary};
use crate::replay::player::Step;
use crate::replay::recorder::Snapshot;

// =============================================================================
// FORMATTER IMPLEMENTATION
// =============================================================================

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter with pretty printing
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON formatter (no pretty printing)
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Serialize to JSON string
    fn to_json<T: serde::Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
        } else {
            serde_json::to_string(value)
                .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayFormatter for JsonFormatter {
    fn format_snapshot(&self, snapshot: &Snapshot) -> String {
        self.to_json(snapshot)
    }

    fn format_listing(&self, snapshots: &[Snapshot]) -> String {
        let summaries: Vec<SnapshotSummary> = snapshots.iter().map(SnapshotSummary::from).collect();
        self.to_json(&summaries)
    }

    fn format_step(&self, step: &Step) -> String {
        self.to_json(step)
    }

    fn format_check(&self, report: &CheckReport) -> String {
        self.to_json(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::builder::rebuild;

    #[test]
    fn test_format_snapshot_json() {
        let result = rebuild("call: p\nfail: p\nredo(0): p\nexit: p");
        let output = JsonFormatter::new().format_snapshot(&result.snapshots[0]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["index"], 0);
        assert_eq!(value["range"]["start"], 0);
        assert_eq!(value["range"]["end"], 3);
        assert_eq!(value["termination"]["kind"], "redo");
        assert_eq!(value["termination"]["line"], 2);

        let p = &value["tree"]["children"][0];
        assert_eq!(p["label"], "p");
        assert_eq!(p["truth"], "failed");
        assert_eq!(p["depth"], 1);
        assert!(p["children"][0].get("children").is_none());
    }

    #[test]
    fn test_compact_is_single_line() {
        let result = rebuild("call: p\nexit: p");
        let output = JsonFormatter::compact().format_snapshot(&result.snapshots[0]);
        assert!(!output.contains('\n'));
        assert!(output.contains(r#""termination":{"kind":"final"}"#));
    }

    #[test]
    fn test_format_listing_json() {
        let result = rebuild("call: p\nfail: p\nredo: p\nexit: p");
        let output = JsonFormatter::new().format_listing(&result.snapshots);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["outcome"], "succeeded");
        assert_eq!(value[1]["calls"], 2);
    }

    #[test]
    fn test_format_check_json() {
        let result = rebuild("call: p\nredo: nowhere\nexit: p");
        let output = JsonFormatter::new().format_check(&CheckReport::new("t", &result));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["lossy"], true);
        assert_eq!(value["stats"]["unresolved_redos"], 1);
        assert_eq!(value["diagnostics"][0]["kind"], "unresolved_redo");
        assert_eq!(value["diagnostics"][0]["line"], 1);
    }
}
