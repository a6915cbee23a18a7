//! Plain text output formatters
//!
//! Provides simple text output without ANSI codes for:
//! - Piping to other tools
//! - Log files
//! - Environments without color support
//!
//! Also includes the DOT formatter.
//!
//! @module replay/output/plain

use super::{elide, CheckReport, FormatOptions, ReplayFormatter, SnapshotSummary};
use crate::replay::player::Step;
use crate::replay::recorder::Snapshot;
use crate::replay::tree::{SnapshotNode, Truth};

// =============================================================================
// PLAIN TEXT FORMATTER
// =============================================================================

/// Plain text formatter (no ANSI codes)
pub struct PlainFormatter {
    max_label_width: usize,
}

impl PlainFormatter {
    /// Create a new plain text formatter
    pub fn new(options: FormatOptions) -> Self {
        Self {
            max_label_width: options.max_label_width,
        }
    }

    /// Two spaces of indent per level, truth in brackets
    fn write_tree(&self, tree: &SnapshotNode, output: &mut String) {
        for (level, node) in tree.walk_with_level() {
            output.push_str(&format!(
                "{}{} [{}]\n",
                "  ".repeat(level),
                elide(&node.label, self.max_label_width),
                node.truth
            ));
        }
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

impl ReplayFormatter for PlainFormatter {
    fn format_snapshot(&self, snapshot: &Snapshot) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "SNAPSHOT {} (lines {}, {})\n",
            snapshot.index, snapshot.range, snapshot.termination
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        self.write_tree(&snapshot.tree, &mut output);

        output
    }

    fn format_listing(&self, snapshots: &[Snapshot]) -> String {
        let mut output = String::new();

        output.push_str(&format!("SNAPSHOTS: {}\n", snapshots.len()));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for snapshot in snapshots {
            let summary = SnapshotSummary::from(snapshot);
            let outcome = summary
                .outcome
                .map_or_else(|| "-".to_string(), |t| t.to_string());
            output.push_str(&format!(
                "{:>4}  {:<12} {:<20} {:>5} calls  {}\n",
                summary.index,
                summary.range.to_string(),
                summary.termination.to_string(),
                summary.calls,
                outcome
            ));
        }

        output
    }

    fn format_step(&self, step: &Step) -> String {
        let mut output = String::new();

        output.push_str(&format!("LINE {}: {}\n", step.line + 1, step.text));
        output.push_str(&format!(
            "Snapshot: {}  Current: {}\n",
            step.snapshot_index,
            elide(&step.current, self.max_label_width)
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        self.write_tree(&step.tree, &mut output);

        output
    }

    fn format_check(&self, report: &CheckReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("CHECK: {}\n", report.source));
        output.push_str(&format!("Stats: {}\n", report.stats));
        output.push_str(&format!("Snapshots: {}\n", report.snapshots));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        if report.diagnostics.is_empty() {
            output.push_str("No problems found\n");
        }
        for diagnostic in &report.diagnostics {
            output.push_str(&format!("{}\n", diagnostic));
        }

        output
    }
}

// =============================================================================
// DOT FORMATTER
// =============================================================================

/// DOT formatter for graph visualization
pub struct DotFormatter;

impl DotFormatter {
    pub fn new() -> Self {
        Self
    }

    fn escape_dot(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }

    fn fill_color(truth: Truth) -> &'static str {
        match truth {
            Truth::Succeeded => "lightgreen",
            Truth::Failed => "salmon",
            Truth::Unknown => "lightblue",
        }
    }

    /// Emit nodes and edges in pre-order; ids are `{prefix}{n}`
    fn write_nodes(tree: &SnapshotNode, prefix: &str, indent: &str, output: &mut String) {
        let mut next = 0usize;
        let mut stack: Vec<(&SnapshotNode, Option<usize>)> = vec![(tree, None)];

        while let Some((node, parent)) = stack.pop() {
            let id = next;
            next += 1;
            output.push_str(&format!(
                "{}{}{} [label=\"{}\", fillcolor={}];\n",
                indent,
                prefix,
                id,
                Self::escape_dot(&node.label),
                Self::fill_color(node.truth)
            ));
            if let Some(parent) = parent {
                output.push_str(&format!("{}{}{} -> {}{};\n", indent, prefix, parent, prefix, id));
            }
            for child in node.children.iter().rev() {
                stack.push((child, Some(id)));
            }
        }
    }

    fn graph(name: &str, tree: &SnapshotNode) -> String {
        let mut output = format!("digraph {} {{\n", name);
        output.push_str("  node [shape=box, style=filled];\n\n");
        Self::write_nodes(tree, "n", "  ", &mut output);
        output.push_str("}\n");
        output
    }
}

impl Default for DotFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayFormatter for DotFormatter {
    fn format_snapshot(&self, snapshot: &Snapshot) -> String {
        Self::graph(&format!("snapshot_{}", snapshot.index), &snapshot.tree)
    }

    fn format_listing(&self, snapshots: &[Snapshot]) -> String {
        let mut output = String::from("digraph snapshots {\n");
        output.push_str("  node [shape=box, style=filled];\n");

        for snapshot in snapshots {
            output.push_str(&format!("\n  subgraph cluster_{} {{\n", snapshot.index));
            output.push_str(&format!(
                "    label=\"snapshot {} ({})\";\n",
                snapshot.index,
                Self::escape_dot(&snapshot.range.to_string())
            ));
            Self::write_nodes(
                &snapshot.tree,
                &format!("s{}_", snapshot.index),
                "    ",
                &mut output,
            );
            output.push_str("  }\n");
        }

        output.push_str("}\n");
        output
    }

    fn format_step(&self, step: &Step) -> String {
        Self::graph(&format!("line_{}", step.line + 1), &step.tree)
    }

    fn format_check(&self, _report: &CheckReport) -> String {
        String::from("// Check reports not suitable for DOT format\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::builder::rebuild;
    use crate::replay::player::Replay;

    #[test]
    fn test_format_snapshot_plain() {
        let result = rebuild("call: p\ncall: q\nfail: q\nfail: p");
        let output = PlainFormatter::default().format_snapshot(&result.snapshots[0]);

        assert!(output.contains("SNAPSHOT 0 (lines 1-4, final)"));
        assert!(output.contains("root [unknown]\n  p [failed]\n    q [failed]\n      q [failed]\n"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_plain_elides_long_labels() {
        let result = rebuild("call: a_very_long_predicate_name(X)\nexit: a_very_long_predicate_name(1)");
        let formatter = PlainFormatter::new(FormatOptions {
            max_label_width: 10,
            ..FormatOptions::default()
        });
        let output = formatter.format_snapshot(&result.snapshots[0]);
        assert!(output.contains("  a_very_... [succeeded]"));
        assert!(!output.contains("a_very_long"));
    }

    #[test]
    fn test_format_listing_plain() {
        let result = rebuild("call: p\nfail: p\nredo: p\nexit: p");
        let output = PlainFormatter::default().format_listing(&result.snapshots);
        assert!(output.contains("SNAPSHOTS: 2"));
        assert!(output.contains("redo at line 3"));
        assert!(output.contains("succeeded"));
    }

    #[test]
    fn test_format_step_plain() {
        let replay = Replay::new("call: p\nexit: p");
        let step = replay.state_at(0).unwrap();
        let output = PlainFormatter::default().format_step(&step);
        assert!(output.starts_with("LINE 1: call: p\n"));
        assert!(output.contains("Current: p"));
    }

    #[test]
    fn test_format_check_plain() {
        let result = rebuild("call: p\n???\nexit: q");
        let output = PlainFormatter::default().format_check(&CheckReport::new("t.txt", &result));
        assert!(output.contains("CHECK: t.txt"));
        assert!(output.contains("line 2: [unparseable]"));
    }

    #[test]
    fn test_format_snapshot_dot() {
        let result = rebuild("call: p\ncall: q(\"x\")\nexit: q(\"x\")\nfail: p");
        let output = DotFormatter::new().format_snapshot(&result.snapshots[0]);

        assert!(output.starts_with("digraph snapshot_0 {"));
        assert!(output.contains("n0 [label=\"root\", fillcolor=lightblue];"));
        assert!(output.contains("n1 [label=\"p\", fillcolor=salmon];"));
        assert!(output.contains("n2 [label=\"q(\\\"x\\\")\", fillcolor=lightgreen];"));
        assert!(output.contains("n0 -> n1;"));
        assert!(output.contains("n2 -> n3;"));
        assert!(output.trim_end().ends_with('}'));
    }

    #[test]
    fn test_dot_listing_uses_clusters() {
        let result = rebuild("call: p\nfail: p\nredo: p\nexit: p");
        let output = DotFormatter::new().format_listing(&result.snapshots);
        assert!(output.contains("subgraph cluster_0"));
        assert!(output.contains("subgraph cluster_1"));
        assert!(output.contains("s1_0 -> s1_1;"));
    }
}
