//! Replay Navigation
//!
//! Holds a loaded trace and its reconstruction and lets a viewer move through
//! it two ways:
//! - snapshot by snapshot, cycling back to the first after the last
//! - line by line, where each step rebuilds the prefix up to that line and
//!   restarts from the top after the final line
//!
//! Stepping never mutates the full reconstruction, so both cursors can be
//! used side by side.
//!
//! @module replay/player

use serde::Serialize;
use tracing::debug;

use super::builder::{rebuild_prefix, Reconstruction};
use super::event::{classify_lines, normalize_lines, Event};
use super::recorder::Snapshot;
use super::tree::SnapshotNode;
use crate::core::error::{Error, Result};

// =============================================================================
// TYPES
// =============================================================================

/// Tree state after one line of the stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// 0-based line just processed
    pub line: usize,
    /// The line itself, for highlighting
    pub text: String,
    /// Snapshot whose range covers `line`
    pub snapshot_index: usize,
    /// Label of the open frame after the line
    pub current: String,
    pub tree: SnapshotNode,
}

/// A loaded trace plus navigation cursors
#[derive(Debug, Clone)]
pub struct Replay {
    lines: Vec<String>,
    events: Vec<Option<Event>>,
    reconstruction: Reconstruction,
    snapshot_cursor: Option<usize>,
    line_cursor: usize,
}

// =============================================================================
// REPLAY
// =============================================================================

impl Replay {
    /// Normalize, classify and rebuild `text` once
    pub fn new(text: &str) -> Self {
        let lines: Vec<String> = normalize_lines(text)
            .into_iter()
            .map(str::to_string)
            .collect();
        let events = classify_lines(&lines);
        let reconstruction = rebuild_prefix(&lines, &events, lines.len());

        Self {
            lines,
            events,
            reconstruction,
            snapshot_cursor: None,
            line_cursor: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn reconstruction(&self) -> &Reconstruction {
        &self.reconstruction
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.reconstruction.snapshots
    }

    /// Snapshot by index
    pub fn snapshot(&self, index: usize) -> Result<&Snapshot> {
        let total = self.snapshots().len();
        self.snapshots()
            .get(index)
            .ok_or(Error::SnapshotOutOfRange { index, total })
    }

    /// Index the snapshot cursor points at, `None` before the first call to
    /// [`Replay::next_snapshot`]
    pub fn snapshot_cursor(&self) -> Option<usize> {
        self.snapshot_cursor
    }

    /// Next line [`Replay::step`] will process
    pub fn line_cursor(&self) -> usize {
        self.line_cursor
    }

    /// Advance to the next snapshot, wrapping to the first after the last.
    ///
    /// The line cursor moves to the first line after the snapshot's range.
    pub fn next_snapshot(&mut self) -> &Snapshot {
        let total = self.reconstruction.snapshots.len();
        let index = self.snapshot_cursor.map_or(0, |i| (i + 1) % total);
        self.snapshot_cursor = Some(index);

        let snapshot = &self.reconstruction.snapshots[index];
        self.line_cursor = snapshot.range.end;
        debug!(index, range = %snapshot.range, "Moved to snapshot");
        snapshot
    }

    /// Process the next line and return the tree after it.
    ///
    /// Past the last line this returns `None` once and rewinds to the start.
    pub fn step(&mut self) -> Option<Step> {
        if self.line_cursor >= self.lines.len() {
            self.line_cursor = 0;
            return None;
        }

        let step = self.state_after(self.line_cursor);
        self.line_cursor += 1;
        Some(step)
    }

    /// Tree state after processing lines `0..=line`
    pub fn state_at(&self, line: usize) -> Result<Step> {
        if line >= self.lines.len() {
            return Err(Error::LineOutOfRange {
                line,
                total: self.lines.len(),
            });
        }
        Ok(self.state_after(line))
    }

    /// Rewind both cursors
    pub fn reset(&mut self) {
        self.snapshot_cursor = None;
        self.line_cursor = 0;
    }

    fn state_after(&self, line: usize) -> Step {
        let prefix = rebuild_prefix(&self.lines, &self.events, line + 1);
        let snapshot_index = self
            .reconstruction
            .snapshot_for_line(line)
            .unwrap_or(self.reconstruction.snapshots.len() - 1);

        Step {
            line,
            text: self.lines[line].clone(),
            snapshot_index,
            current: prefix.tree.node(prefix.current).label.clone(),
            tree: prefix.tree.freeze_root(),
        }
    }
}
