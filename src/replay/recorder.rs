//! Snapshot/Provenance Recorder
//!
//! Keeps the ordered list of frozen trees taken at every resolved redo and at
//! the end of the stream, each tagged with the lines it covers.
//!
//! @module replay/recorder

use serde::Serialize;
use tracing::debug;

use super::tree::{CallTree, SnapshotNode};

// =============================================================================
// TYPES
// =============================================================================

/// Half-open range `[start, end)` over the normalized line stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line < self.end
    }

    /// Last line inside the range
    pub fn last(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }
}

impl std::fmt::Display for LineRange {
    /// 1-based inclusive, the way editors number lines
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last() {
            Some(last) => write!(f, "{}-{}", self.start + 1, last + 1),
            None => write!(f, "(empty)"),
        }
    }
}

/// What closed a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Termination {
    /// Backtracking into an earlier frame at `line`
    Redo { line: usize },
    /// End of the stream
    Final,
}

impl Termination {
    pub fn is_final(&self) -> bool {
        matches!(self, Termination::Final)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Redo { line } => write!(f, "redo at line {}", line + 1),
            Termination::Final => write!(f, "final"),
        }
    }
}

/// Immutable copy of the call tree at a backtracking boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Position in the snapshot sequence
    pub index: usize,
    pub range: LineRange,
    pub termination: Termination,
    pub tree: SnapshotNode,
}

impl Snapshot {
    /// Number of frames below the root
    pub fn call_count(&self) -> usize {
        self.tree.len() - 1
    }
}

// =============================================================================
// RECORDER
// =============================================================================

/// Collects snapshots in order while the builder runs
#[derive(Debug, Default)]
pub struct SnapshotRecorder {
    snapshots: Vec<Snapshot>,
    next_start: usize,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze the tree at a redo on `line`; the range runs up to and
    /// including that line.
    pub fn record_redo(&mut self, tree: &CallTree, line: usize) {
        self.push(tree, line + 1, Termination::Redo { line });
    }

    /// Freeze the tree at the end of a stream of `total_lines` lines
    pub fn record_final(&mut self, tree: &CallTree, total_lines: usize) {
        self.push(tree, total_lines, Termination::Final);
    }

    fn push(&mut self, tree: &CallTree, end: usize, termination: Termination) {
        let range = LineRange::new(self.next_start, end);
        let snapshot = Snapshot {
            index: self.snapshots.len(),
            range,
            termination,
            tree: tree.freeze_root(),
        };
        debug!(
            index = snapshot.index,
            range = %range,
            nodes = snapshot.tree.len(),
            %termination,
            "Recorded snapshot"
        );
        self.snapshots.push(snapshot);
        self.next_start = range.end;
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::tree::Truth;

    #[test]
    fn test_ranges_are_contiguous() {
        let mut tree = CallTree::new();
        let mut recorder = SnapshotRecorder::new();

        recorder.record_redo(&tree, 3);
        tree.add_child(tree.root(), "p", Truth::Succeeded);
        recorder.record_redo(&tree, 5);
        recorder.record_final(&tree, 9);

        let ranges: Vec<_> = recorder.snapshots().iter().map(|s| s.range).collect();
        assert_eq!(
            ranges,
            vec![
                LineRange::new(0, 4),
                LineRange::new(4, 6),
                LineRange::new(6, 9)
            ]
        );
        assert_eq!(
            recorder.snapshots()[1].termination,
            Termination::Redo { line: 5 }
        );
        assert!(recorder.snapshots()[2].termination.is_final());
        assert_eq!(recorder.snapshots()[2].index, 2);
    }

    #[test]
    fn test_final_after_trailing_redo_is_empty() {
        let tree = CallTree::new();
        let mut recorder = SnapshotRecorder::new();
        recorder.record_redo(&tree, 2);
        recorder.record_final(&tree, 3);

        let last = &recorder.snapshots()[1];
        assert!(last.range.is_empty());
        assert_eq!(last.range.last(), None);
        assert_eq!(last.range.to_string(), "(empty)");
    }

    #[test]
    fn test_snapshot_unaffected_by_later_mutation() {
        let mut tree = CallTree::new();
        let p = tree.add_child(tree.root(), "p", Truth::Unknown);
        let mut recorder = SnapshotRecorder::new();
        recorder.record_redo(&tree, 1);

        tree.node_mut(p).truth = Truth::Failed;
        tree.add_child(p, "q", Truth::Failed);

        let snap = &recorder.snapshots()[0];
        assert_eq!(snap.tree.children[0].truth, Truth::Unknown);
        assert!(snap.tree.children[0].children.is_empty());
        assert_eq!(snap.call_count(), 1);
    }

    #[test]
    fn test_range_display_is_one_based() {
        assert_eq!(LineRange::new(0, 4).to_string(), "1-4");
        assert!(LineRange::new(2, 5).contains(4));
        assert!(!LineRange::new(2, 5).contains(5));
    }
}
