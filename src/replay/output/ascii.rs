//! ASCII output formatter with colors and box-drawing
//!
//! Provides rich terminal output with:
//! - Unicode tree connectors
//! - ANSI colors keyed to truth state (can be switched off)
//! - Terminal width detection for header boxes
//!
//! @module replay/output/ascii

use super::{elide, truth_marker, CheckReport, FormatOptions, ReplayFormatter, SnapshotSummary};
use crate::replay::diagnostics::DiagnosticKind;
use crate::replay::player::Step;
use crate::replay::recorder::Snapshot;
use crate::replay::tree::{SnapshotNode, Truth};

// =============================================================================
// CONSTANTS
// =============================================================================

/// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
}

/// Box-drawing characters
mod box_chars {
    pub const TOP_LEFT: char = '╔';
    pub const TOP_RIGHT: char = '╗';
    pub const BOTTOM_LEFT: char = '╚';
    pub const BOTTOM_RIGHT: char = '╝';
    pub const HORIZONTAL: char = '═';
    pub const VERTICAL: char = '║';
    pub const THIN_HORIZONTAL: char = '━';

    pub const BRANCH: &str = "├── ";
    pub const LAST_BRANCH: &str = "└── ";
    pub const PIPE: &str = "│   ";
    pub const SPACE: &str = "    ";
}

// =============================================================================
// FORMATTER IMPLEMENTATION
// =============================================================================

/// ASCII formatter with rich terminal output
pub struct AsciiFormatter {
    width: usize,
    color: bool,
    max_label_width: usize,
}

impl AsciiFormatter {
    /// Create a new ASCII formatter
    pub fn new(options: FormatOptions) -> Self {
        Self {
            width: Self::detect_terminal_width(),
            color: options.color,
            max_label_width: options.max_label_width,
        }
    }

    /// Detect terminal width, defaulting to 80
    fn detect_terminal_width() -> usize {
        if let Ok(cols) = std::env::var("COLUMNS") {
            if let Ok(width) = cols.parse::<usize>() {
                return width.clamp(60, 200);
            }
        }

        80
    }

    /// Wrap `text` in an ANSI code when colors are on
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, colors::RESET)
        } else {
            text.to_string()
        }
    }

    fn truth_color(truth: Truth) -> &'static str {
        match truth {
            Truth::Succeeded => colors::GREEN,
            Truth::Failed => colors::RED,
            Truth::Unknown => colors::BLUE,
        }
    }

    /// Draw a header box
    fn draw_header_box<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let inner_width = self.width - 4;
        let mut output = String::new();

        output.push(box_chars::TOP_LEFT);
        for _ in 0..inner_width + 2 {
            output.push(box_chars::HORIZONTAL);
        }
        output.push(box_chars::TOP_RIGHT);
        output.push('\n');

        for line in lines {
            output.push(box_chars::VERTICAL);
            output.push_str("  ");
            output.push_str(&self.truncate_or_pad(line.as_ref(), inner_width));
            output.push_str("  ");
            output.push(box_chars::VERTICAL);
            output.push('\n');
        }

        output.push(box_chars::BOTTOM_LEFT);
        for _ in 0..inner_width + 2 {
            output.push(box_chars::HORIZONTAL);
        }
        output.push(box_chars::BOTTOM_RIGHT);
        output.push('\n');

        output
    }

    /// Draw a separator line
    fn draw_separator(&self) -> String {
        let mut output = String::new();
        for _ in 0..self.width - 2 {
            output.push(box_chars::THIN_HORIZONTAL);
        }
        output.push('\n');
        output
    }

    /// Truncate or pad a string to fit width
    fn truncate_or_pad(&self, s: &str, width: usize) -> String {
        let visible_len = Self::visible_len(s);
        if visible_len <= width {
            return format!("{}{}", s, " ".repeat(width - visible_len));
        }

        let mut result = String::new();
        let mut visible_count = 0;
        let mut in_escape = false;
        for c in s.chars() {
            if c == '\x1b' {
                in_escape = true;
                result.push(c);
            } else if in_escape {
                result.push(c);
                if c == 'm' {
                    in_escape = false;
                }
            } else {
                if visible_count >= width.saturating_sub(3) {
                    result.push_str("...");
                    if self.color {
                        result.push_str(colors::RESET);
                    }
                    break;
                }
                result.push(c);
                visible_count += 1;
            }
        }
        result
    }

    /// Calculate visible length (excluding ANSI codes)
    fn visible_len(s: &str) -> usize {
        let mut len = 0;
        let mut in_escape = false;

        for c in s.chars() {
            if c == '\x1b' {
                in_escape = true;
            } else if in_escape {
                if c == 'm' {
                    in_escape = false;
                }
            } else {
                len += 1;
            }
        }

        len
    }

    fn node_line(&self, node: &SnapshotNode) -> String {
        let color = Self::truth_color(node.truth);
        format!(
            "{} {}",
            self.paint(color, truth_marker(node.truth)),
            self.paint(color, &elide(&node.label, self.max_label_width))
        )
    }

    /// Render the tree with `├──`/`└──` connectors
    fn draw_tree(&self, root: &SnapshotNode) -> String {
        let mut output = self.node_line(root);
        output.push('\n');

        // (node, prefix of its parent's children, is last sibling)
        let mut stack: Vec<(&SnapshotNode, String, bool)> = Vec::new();
        push_children(&mut stack, root, String::new());

        while let Some((node, prefix, last)) = stack.pop() {
            let connector = if last {
                box_chars::LAST_BRANCH
            } else {
                box_chars::BRANCH
            };
            output.push_str(&self.paint(colors::DIM, &format!("{}{}", prefix, connector)));
            output.push_str(&self.node_line(node));
            output.push('\n');

            let child_prefix = format!(
                "{}{}",
                prefix,
                if last { box_chars::SPACE } else { box_chars::PIPE }
            );
            push_children(&mut stack, node, child_prefix);
        }
        output
    }

    fn color_diagnostic(&self, kind: DiagnosticKind) -> &'static str {
        match kind {
            DiagnosticKind::ApproximateRedo => colors::CYAN,
            DiagnosticKind::StrayExit => colors::YELLOW,
            DiagnosticKind::Unparseable | DiagnosticKind::UnresolvedRedo => colors::RED,
        }
    }
}

impl Default for AsciiFormatter {
    fn default() -> Self {
        Self::new(FormatOptions::default())
    }
}

impl ReplayFormatter for AsciiFormatter {
    fn format_snapshot(&self, snapshot: &Snapshot) -> String {
        let mut output = String::new();

        let header_lines = [
            format!(
                "{} {}",
                self.paint(&format!("{}{}", colors::BOLD, colors::CYAN), "SNAPSHOT:"),
                snapshot.index
            ),
            format!("{} {}", self.paint(colors::DIM, "Lines:"), snapshot.range),
            format!(
                "{} {}",
                self.paint(colors::DIM, "Closed by:"),
                snapshot.termination
            ),
            format!(
                "{} {} calls, height {}",
                self.paint(colors::DIM, "Size:"),
                snapshot.call_count(),
                snapshot.tree.height()
            ),
        ];
        output.push_str(&self.draw_header_box(&header_lines));
        output.push('\n');
        output.push_str(&self.draw_tree(&snapshot.tree));

        output
    }

    fn format_listing(&self, snapshots: &[Snapshot]) -> String {
        let mut output = String::new();

        let header = [format!(
            "{} {}",
            self.paint(&format!("{}{}", colors::BOLD, colors::CYAN), "SNAPSHOTS:"),
            snapshots.len()
        )];
        output.push_str(&self.draw_header_box(&header));
        output.push('\n');

        for snapshot in snapshots {
            let summary = SnapshotSummary::from(snapshot);
            let outcome = match summary.outcome {
                Some(truth) => self.paint(
                    Self::truth_color(truth),
                    &format!("{} {}", truth_marker(truth), truth),
                ),
                None => self.paint(colors::DIM, "-"),
            };
            output.push_str(&format!(
                "  {}  {}  {:<20}  {:>5} calls  {}\n",
                self.paint(colors::BOLD, &format!("#{:<3}", summary.index)),
                self.paint(colors::DIM, &format!("{:<12}", summary.range.to_string())),
                summary.termination.to_string(),
                summary.calls,
                outcome
            ));
        }

        output
    }

    fn format_step(&self, step: &Step) -> String {
        let mut output = String::new();

        let header_lines = [
            format!(
                "{} {}",
                self.paint(&format!("{}{}", colors::BOLD, colors::CYAN), "LINE:"),
                step.line + 1
            ),
            format!(
                "{} {}",
                self.paint(colors::DIM, "Text:"),
                self.paint(colors::YELLOW, &step.text)
            ),
            format!(
                "{} {}  {} {}",
                self.paint(colors::DIM, "Snapshot:"),
                step.snapshot_index,
                self.paint(colors::DIM, "Current:"),
                elide(&step.current, self.max_label_width)
            ),
        ];
        output.push_str(&self.draw_header_box(&header_lines));
        output.push('\n');
        output.push_str(&self.draw_tree(&step.tree));

        output
    }

    fn format_check(&self, report: &CheckReport) -> String {
        let mut output = String::new();

        let verdict = if report.lossy {
            self.paint(colors::RED, "lossy")
        } else {
            self.paint(colors::GREEN, "clean")
        };
        let header_lines = [
            format!(
                "{} {}",
                self.paint(&format!("{}{}", colors::BOLD, colors::CYAN), "CHECK:"),
                report.source
            ),
            format!("{} {}", self.paint(colors::DIM, "Stats:"), report.stats),
            format!(
                "{} {}  {} {}",
                self.paint(colors::DIM, "Snapshots:"),
                report.snapshots,
                self.paint(colors::DIM, "Result:"),
                verdict
            ),
        ];
        output.push_str(&self.draw_header_box(&header_lines));

        if report.diagnostics.is_empty() {
            return output;
        }

        output.push('\n');
        output.push_str(&self.draw_separator());
        for diagnostic in &report.diagnostics {
            output.push_str(&format!(
                "  {}  {}  {}\n",
                self.paint(colors::DIM, &format!("line {:<5}", diagnostic.line + 1)),
                self.paint(
                    self.color_diagnostic(diagnostic.kind),
                    &format!("{:<17}", diagnostic.kind.as_str())
                ),
                diagnostic.message
            ));
        }

        output
    }
}

/// Queue `node`'s children so the first one pops first
fn push_children<'a>(
    stack: &mut Vec<(&'a SnapshotNode, String, bool)>,
    node: &'a SnapshotNode,
    prefix: String,
) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate().rev() {
        stack.push((child, prefix.clone(), i + 1 == count));
    }
}
