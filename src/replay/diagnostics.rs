//! Recoverable anomalies found while rebuilding a trace
//!
//! @module replay/diagnostics

use serde::Serialize;

/// Kind of anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Line does not follow the trace grammar; skipped
    Unparseable,
    /// Redo target found only by signature; its label was rewritten
    ApproximateRedo,
    /// No node matches the redo goal; the event was ignored
    UnresolvedRedo,
    /// Exit or fail arrived with no open call; the event was ignored
    StrayExit,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Unparseable => "unparseable",
            DiagnosticKind::ApproximateRedo => "approximate_redo",
            DiagnosticKind::UnresolvedRedo => "unresolved_redo",
            DiagnosticKind::StrayExit => "stray_exit",
        }
    }

    /// Anomalies that mean parts of the trace were dropped
    pub fn is_lossy(&self) -> bool {
        !matches!(self, DiagnosticKind::ApproximateRedo)
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One anomaly tied to a line of the normalized stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 0-based line index
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: [{}] {}", self.line + 1, self.kind, self.message)
    }
}
