//! Event Classifier
//!
//! Turns one line of a resolution trace into a typed [`Event`]:
//!
//! ```text
//! <kind>[(<digits>)]: <content> [@ <location>]
//! kind ::= call | exit | fail | redo
//! ```
//!
//! Lines that do not follow the grammar are rejected, never fatal.
//!
//! @module replay/event

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Goal text that marks a control-flow `fail`, not a real call result
pub const FAIL_SENTINEL: &str = "fail";

/// Separator between goal text and the source location
const LOCATION_MARKER: &str = " @ ";

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(call|exit|fail|redo)(?:\((\d+)\))?:(.*)$").expect("valid line pattern")
});

// =============================================================================
// TYPES
// =============================================================================

/// The four port kinds of the box model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Call,
    Exit,
    Fail,
    Redo,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Call => "call",
            EventKind::Exit => "exit",
            EventKind::Fail => "fail",
            EventKind::Redo => "redo",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed trace line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub kind: EventKind,
    /// Goal text with the location suffix removed
    pub content: String,
    /// 0-based index in the normalized line stream
    pub line: usize,
    /// The `(N)` after the kind; descriptive only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_hint: Option<u32>,
    /// The stripped `@ location` text, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Event {
    /// `call: fail` and `fail: fail` carry no tree information
    pub fn is_sentinel_noop(&self) -> bool {
        matches!(self.kind, EventKind::Call | EventKind::Fail) && self.content == FAIL_SENTINEL
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classify one line. Returns `None` when the line does not match the grammar.
///
/// The line is trimmed first; `line` is stored on the event unchanged.
pub fn classify_line(raw: &str, line: usize) -> Option<Event> {
    let caps = LINE_PATTERN.captures(raw.trim())?;

    let kind = match &caps[1] {
        "call" => EventKind::Call,
        "exit" => EventKind::Exit,
        "fail" => EventKind::Fail,
        _ => EventKind::Redo,
    };
    let depth_hint = caps.get(2).and_then(|m| m.as_str().parse().ok());

    let rest = &caps[3];
    let (content, location) = match rest.rfind(LOCATION_MARKER) {
        Some(at) => (
            &rest[..at],
            Some(rest[at + LOCATION_MARKER.len()..].trim().to_string()),
        ),
        None => (rest, None),
    };

    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    Some(Event {
        kind,
        content: content.to_string(),
        line,
        depth_hint,
        location,
    })
}

/// Classify every line of a normalized stream, keeping positions
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Option<Event>> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| classify_line(line.as_ref(), i))
        .collect()
}

/// Split raw trace text into the normalized line stream.
///
/// Lines are trimmed and blank lines dropped; indexes into the result are the
/// line numbers used by events, ranges and replay.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
