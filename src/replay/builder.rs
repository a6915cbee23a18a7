//! Call Tree Builder
//!
//! State machine that consumes trace events in order and mutates the live
//! call tree. `call` opens a frame under the cursor, `exit`/`fail` close the
//! cursor frame, and `redo` backtracks into an earlier frame:
//!
//! 1. every frame on the open chain is marked failed and the cursor returns
//!    to the root
//! 2. the tree is frozen into a snapshot
//! 3. the frame being resumed is found by BFS, by exact label first and by
//!    functor signature second
//! 4. children explored after the resumed branch are dropped, at the target
//!    and at every ancestor
//!
//! Nothing in here can fail. Anomalies become [`Diagnostic`]s.
//!
//! @module replay/builder

use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::event::{classify_lines, normalize_lines, Event, EventKind};
use super::recorder::{Snapshot, SnapshotRecorder};
use super::signature::Signature;
use super::tree::{CallTree, NodeId, Truth};

// =============================================================================
// TYPES
// =============================================================================

/// How a redo goal was matched to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RedoTarget {
    /// Node label equals the redo goal verbatim
    Exact(NodeId),
    /// Only name and arity agree
    Approximate(NodeId),
}

/// Counters collected over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub lines: usize,
    pub calls: usize,
    pub exits: usize,
    pub fails: usize,
    pub redos: usize,
    pub resolved_redos: usize,
    pub approximate_redos: usize,
    pub unresolved_redos: usize,
    pub sentinel_noops: usize,
    pub skipped_lines: usize,
}

impl std::fmt::Display for BuildStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lines, {} calls, {} exits, {} fails, {} redos ({} unresolved), {} skipped",
            self.lines,
            self.calls,
            self.exits,
            self.fails,
            self.redos,
            self.unresolved_redos,
            self.skipped_lines
        )
    }
}

/// Everything produced by one full pass over a trace
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Live tree as it stands after the last line
    pub tree: CallTree,
    /// Cursor after the last line
    pub current: NodeId,
    pub snapshots: Vec<Snapshot>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: BuildStats,
}

impl Reconstruction {
    /// Snapshot closed by the end of the stream
    pub fn final_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// Index of the snapshot whose range covers `line`
    pub fn snapshot_for_line(&self, line: usize) -> Option<usize> {
        self.snapshots.iter().position(|s| s.range.contains(line))
    }

    /// Snapshots whose first top-level call succeeded
    pub fn successful_snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter().filter(|s| s.tree.is_successful())
    }

    /// True when some line or redo had to be dropped
    pub fn is_lossy(&self) -> bool {
        self.diagnostics.iter().any(|d| d.kind.is_lossy())
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Incremental builder over a classified event stream
#[derive(Debug)]
pub struct TreeBuilder {
    tree: CallTree,
    current: NodeId,
    recorder: SnapshotRecorder,
    diagnostics: Vec<Diagnostic>,
    stats: BuildStats,
}

impl TreeBuilder {
    pub fn new() -> Self {
        let tree = CallTree::new();
        let current = tree.root();
        Self {
            tree,
            current,
            recorder: SnapshotRecorder::new(),
            diagnostics: Vec::new(),
            stats: BuildStats::default(),
        }
    }

    pub fn tree(&self) -> &CallTree {
        &self.tree
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        self.recorder.snapshots()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Record a line that did not classify
    pub fn skip_line(&mut self, line: usize, raw: &str) {
        warn!(line = line + 1, text = raw, "Skipping unparseable trace line");
        self.stats.skipped_lines += 1;
        self.diagnostics.push(Diagnostic::new(
            DiagnosticKind::Unparseable,
            line,
            format!("could not parse `{}`", raw),
        ));
    }

    /// Apply one event. `lookahead` is the classified line right after it in
    /// the raw stream, `None` when that line is absent or unparseable.
    pub fn apply(&mut self, event: &Event, lookahead: Option<&Event>) {
        if event.is_sentinel_noop() {
            self.stats.sentinel_noops += 1;
            return;
        }

        match event.kind {
            EventKind::Call => {
                self.stats.calls += 1;
                self.current = self
                    .tree
                    .add_child(self.current, event.content.as_str(), Truth::Unknown);
            }
            EventKind::Exit => {
                self.stats.exits += 1;
                self.close(event, Truth::Succeeded);
            }
            EventKind::Fail => {
                self.stats.fails += 1;
                self.close(event, Truth::Failed);
            }
            EventKind::Redo => {
                self.stats.redos += 1;
                self.redo(event, lookahead);
            }
        }
    }

    /// Close the cursor frame with `truth` and pop to its parent.
    ///
    /// A frame closed without any sub-call gets a leaf carrying the exit
    /// goal, so closed frames are never childless.
    fn close(&mut self, event: &Event, truth: Truth) {
        let frame = self.current;
        if frame == self.tree.root() {
            warn!(line = event.line + 1, kind = %event.kind, "No open call to close");
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::StrayExit,
                event.line,
                format!("{} of `{}` with no open call", event.kind, event.content),
            ));
            return;
        }

        if self.tree.children(frame).is_empty() {
            self.tree.add_leaf(frame, event.content.as_str(), truth);
        }
        self.tree.node_mut(frame).truth = truth;

        if let Some(parent) = self.tree.parent(frame) {
            self.current = parent;
        }
    }

    // =========================================================================
    // REDO RESOLUTION
    // =========================================================================

    fn redo(&mut self, event: &Event, lookahead: Option<&Event>) {
        // Labels are not touched before relabelling, so searching first finds
        // the same node the invalidated tree would.
        let Some(found) = self.find_redo_target(&event.content) else {
            warn!(line = event.line + 1, goal = %event.content, "Redo target not found");
            self.stats.unresolved_redos += 1;
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnresolvedRedo,
                event.line,
                format!("no frame matches `{}`", event.content),
            ));
            return;
        };

        self.invalidate_open_chain();
        self.recorder.record_redo(&self.tree, event.line);
        self.stats.resolved_redos += 1;

        let target = match found {
            RedoTarget::Exact(id) => id,
            RedoTarget::Approximate(id) => {
                let previous =
                    std::mem::replace(&mut self.tree.node_mut(id).label, event.content.clone());
                debug!(line = event.line + 1, %previous, goal = %event.content, "Redo matched by signature");
                self.stats.approximate_redos += 1;
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ApproximateRedo,
                    event.line,
                    format!("resumed `{}` as `{}`", previous, event.content),
                ));
                id
            }
        };

        if let Some(next) = lookahead {
            self.truncate_to_resumed_child(target, &next.content);
        }

        self.tree.node_mut(target).truth = Truth::Unknown;
        self.current = target;
        self.truncate_ancestors(target);
    }

    /// Mark every open frame failed and move the cursor back to the root
    fn invalidate_open_chain(&mut self) {
        let mut cursor = self.current;
        while let Some(parent) = self.tree.parent(cursor) {
            self.tree.node_mut(cursor).truth = Truth::Failed;
            cursor = parent;
        }
        self.current = cursor;
    }

    /// BFS over the attached tree.
    ///
    /// The last exact match visited wins, otherwise the last signature match.
    /// A synthesized leaf that repeats its frame's goal stands for that frame,
    /// so the frame is resumed instead of the leaf.
    fn find_redo_target(&self, goal: &str) -> Option<RedoTarget> {
        let wanted = Signature::of(goal);
        let mut exact = None;
        let mut approximate = None;

        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(self.tree.root());

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }

            let node = self.tree.node(id);
            queue.extend(node.children.iter().copied());
            // the synthetic root is never a frame to resume
            if node.parent.is_none() {
                continue;
            }
            if node.label == goal {
                exact = Some(id);
            } else if Signature::of(&node.label) == wanted {
                approximate = Some(id);
            }
        }

        match exact {
            Some(id) => Some(RedoTarget::Exact(self.frame_of_leaf(id))),
            None => approximate.map(RedoTarget::Approximate),
        }
    }

    /// The frame a synthesized leaf was closed under, when both carry the
    /// same goal; `id` itself otherwise.
    fn frame_of_leaf(&self, id: NodeId) -> NodeId {
        let node = self.tree.node(id);
        match node.parent {
            Some(parent)
                if node.synthesized
                    && parent != self.tree.root()
                    && self.tree.node(parent).label == node.label =>
            {
                parent
            }
            _ => id,
        }
    }

    /// Keep the target's children up to the first one shaped like the goal
    /// that follows the redo; drop them all if none is.
    fn truncate_to_resumed_child(&mut self, target: NodeId, next_goal: &str) {
        let wanted = Signature::of(next_goal);
        let keep = self
            .tree
            .children(target)
            .iter()
            .position(|&child| Signature::of(&self.tree.node(child).label) == wanted)
            .map_or(0, |i| i + 1);
        self.tree.truncate_children(target, keep);
    }

    /// Drop every sibling explored after the path from root to `target`
    fn truncate_ancestors(&mut self, target: NodeId) {
        let mut cursor = target;
        while let Some(parent) = self.tree.parent(cursor) {
            if let Some(i) = self.tree.children(parent).iter().position(|&c| c == cursor) {
                self.tree.truncate_children(parent, i + 1);
            }
            cursor = parent;
        }
    }

    /// Close the stream: take the final snapshot and hand everything back
    pub fn finish(mut self, total_lines: usize) -> Reconstruction {
        self.recorder.record_final(&self.tree, total_lines);
        self.stats.lines = total_lines;
        info!(stats = %self.stats, snapshots = self.recorder.snapshots().len(), "Trace rebuilt");

        Reconstruction {
            tree: self.tree,
            current: self.current,
            snapshots: self.recorder.into_snapshots(),
            diagnostics: self.diagnostics,
            stats: self.stats,
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Rebuild from raw trace text
pub fn rebuild(text: &str) -> Reconstruction {
    rebuild_lines(&normalize_lines(text))
}

/// Rebuild from an already normalized line stream
pub fn rebuild_lines<S: AsRef<str>>(lines: &[S]) -> Reconstruction {
    let events = classify_lines(lines);
    rebuild_prefix(lines, &events, lines.len())
}

/// Run the builder over the first `end` lines.
///
/// `events` holds the classification of every line of the stream, so a redo
/// on the last line of the prefix still sees the line after it.
pub fn rebuild_prefix<S: AsRef<str>>(
    lines: &[S],
    events: &[Option<Event>],
    end: usize,
) -> Reconstruction {
    let end = end.min(lines.len()).min(events.len());
    let mut builder = TreeBuilder::new();
    for (i, event) in events[..end].iter().enumerate() {
        match event {
            Some(event) => {
                let lookahead = events.get(i + 1).and_then(Option::as_ref);
                builder.apply(event, lookahead);
            }
            None => builder.skip_line(i, lines[i].as_ref()),
        }
    }
    builder.finish(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::event::classify_line;
    use crate::replay::recorder::{LineRange, Termination};
    use crate::replay::tree::SnapshotNode;

    fn labels(node: &SnapshotNode) -> Vec<&str> {
        node.children.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_straight_success() {
        let result = rebuild("call: p\nexit: p");
        assert_eq!(result.snapshots.len(), 1);

        let snap = &result.snapshots[0];
        assert_eq!(snap.termination, Termination::Final);
        assert_eq!(snap.range, LineRange::new(0, 2));

        let p = &snap.tree.children[0];
        assert_eq!(p.label, "p");
        assert_eq!(p.truth, Truth::Succeeded);
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.children[0].truth, Truth::Succeeded);
        assert_eq!(result.current, result.tree.root());
    }

    #[test]
    fn test_nested_failure() {
        let result = rebuild("call: p\ncall: q\nfail: q\nfail: p");
        assert_eq!(result.snapshots.len(), 1);

        let p = &result.snapshots[0].tree.children[0];
        assert_eq!(p.truth, Truth::Failed);
        assert_eq!(labels(p), vec!["q"]);
        assert_eq!(p.children[0].truth, Truth::Failed);
        // q had no sub-calls, so it got a synthesized leaf
        assert_eq!(p.children[0].children[0].label, "q");
    }

    #[test]
    fn test_exit_keeps_existing_children() {
        let result = rebuild("call: p(X)\ncall: q(X)\nexit: q(1)\nexit: p(1)");
        let p = &result.snapshots[0].tree.children[0];
        assert_eq!(labels(p), vec!["q(X)"]);
        assert_eq!(labels(&p.children[0]), vec!["q(1)"]);
    }

    #[test]
    fn test_redo_of_failed_fact() {
        let result = rebuild("call: p\nfail: p\nredo(0): p\nexit: p");
        assert_eq!(result.snapshots.len(), 2);

        let first = &result.snapshots[0];
        assert_eq!(first.termination, Termination::Redo { line: 2 });
        assert_eq!(first.range, LineRange::new(0, 3));
        assert_eq!(first.tree.children[0].truth, Truth::Failed);

        let last = &result.snapshots[1];
        assert_eq!(last.range, LineRange::new(3, 4));
        let p = &last.tree.children[0];
        assert_eq!(p.truth, Truth::Succeeded);
        // the synthesized leaf matches `exit: p` by signature and is kept
        assert_eq!(labels(p), vec!["p"]);
    }

    #[test]
    fn test_sentinels_are_noops() {
        let with = rebuild("call: p\ncall: fail\nfail: fail\nexit: p");
        let without = rebuild("call: p\nexit: p");
        assert_eq!(
            with.final_snapshot().unwrap().tree,
            without.final_snapshot().unwrap().tree
        );
        assert_eq!(with.stats.sentinel_noops, 2);
    }

    #[test]
    fn test_redo_invalidates_open_chain() {
        let trace = "call: a\ncall: b\ncall: c\nredo(0): a";
        let result = rebuild(trace);
        let snap = &result.snapshots[0].tree;
        let a = &snap.children[0];
        assert_eq!(a.truth, Truth::Failed);
        assert_eq!(a.children[0].truth, Truth::Failed);
        assert_eq!(a.children[0].children[0].truth, Truth::Failed);
        assert_eq!(snap.truth, Truth::Unknown);
    }

    #[test]
    fn test_redo_truncates_siblings_after_resumed_child() {
        let trace = "\
call: top
call: gen(X)
exit: gen(1)
call: test(1)
fail: test(1)
redo(0): gen(X)
exit: gen(2)";
        let result = rebuild(trace);
        assert_eq!(result.snapshots.len(), 2);

        // before the redo: gen and test under top
        assert_eq!(
            labels(&result.snapshots[0].tree.children[0]),
            vec!["gen(X)", "test(1)"]
        );

        // after: test(1) is gone, gen kept its synthesized leaf
        let top = &result.snapshots[1].tree.children[0];
        assert_eq!(labels(top), vec!["gen(X)"]);
        assert_eq!(top.children[0].truth, Truth::Succeeded);
        assert_eq!(labels(&top.children[0]), vec!["gen(1)"]);
    }

    #[test]
    fn test_redo_clears_children_without_match() {
        let trace = "\
call: p
call: q
exit: q
exit: p
redo(0): p
call: r
exit: r
exit: p";
        let result = rebuild(trace);
        let p = &result.snapshots[1].tree.children[0];
        assert_eq!(labels(p), vec!["r"]);
        assert_eq!(p.truth, Truth::Succeeded);
    }

    #[test]
    fn test_redo_leaves_children_when_next_line_unparseable() {
        let trace = "\
call: p
call: q
exit: q
exit: p
redo(0): p
garbage here";
        let result = rebuild(trace);
        let p = &result.snapshots[1].tree.children[0];
        assert_eq!(labels(p), vec!["q"]);
        assert_eq!(p.truth, Truth::Unknown);
        assert_eq!(result.tree.node(result.current).label, "p");
    }

    #[test]
    fn test_redo_at_end_of_stream_keeps_children() {
        let result = rebuild("call: p\ncall: q\nexit: q\nexit: p\nredo(0): p");
        assert_eq!(result.snapshots.len(), 2);
        assert!(result.snapshots[1].range.is_empty());
        assert_eq!(labels(&result.snapshots[1].tree.children[0]), vec!["q"]);
    }

    #[test]
    fn test_approximate_redo_relabels_target() {
        let trace = "\
call: member(X,[a,b])
exit: member(a,[a,b])
call: check(a)
fail: check(a)
redo(0): member(_123,[a,b])
exit: member(b,[a,b])";
        let result = rebuild(trace);
        assert_eq!(result.snapshots.len(), 2);
        assert_eq!(result.stats.approximate_redos, 1);

        // the most recently visited match is the exit leaf under the call
        // frame; the snapshot still shows its old label
        let before = &result.snapshots[0].tree.children[0];
        assert_eq!(labels(before), vec!["member(a,[a,b])"]);

        let root = &result.snapshots[1].tree;
        assert_eq!(labels(root), vec!["member(X,[a,b])"]);
        let resumed = &root.children[0].children[0];
        assert_eq!(resumed.label, "member(_123,[a,b])");
        assert_eq!(resumed.truth, Truth::Succeeded);
        assert_eq!(labels(resumed), vec!["member(b,[a,b])"]);

        let diag = &result.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::ApproximateRedo);
        assert_eq!(diag.line, 4);
        assert!(!result.is_lossy());
    }

    #[test]
    fn test_exact_match_beats_signature_match() {
        let trace = "\
call: a(1)
exit: a(1)
call: a(2)
exit: a(2)
redo(0): a(1)
exit: a(1)";
        let result = rebuild(trace);
        // a(2) came later in BFS order but a(1) matches verbatim
        let root = &result.snapshots[1].tree;
        assert_eq!(labels(root), vec!["a(1)"]);
        assert_eq!(result.stats.approximate_redos, 0);
    }

    #[test]
    fn test_latest_exact_match_wins() {
        let trace = "\
call: top
call: a
call: g(X)
exit: g(1)
exit: a
call: b
call: g(X)
exit: g(2)
call: h
fail: h
redo(0): g(X)
exit: g(3)";
        let result = rebuild(trace);
        assert_eq!(result.snapshots.len(), 2);

        // g(X) under `b` is the frame being resumed; the branch under `a` stays
        let top = &result.snapshots[1].tree.children[0];
        assert_eq!(labels(top), vec!["a", "b"]);
        assert_eq!(labels(&top.children[0]), vec!["g(X)"]);
        assert_eq!(labels(&top.children[0].children[0]), vec!["g(1)"]);

        let b = &top.children[1];
        assert_eq!(labels(b), vec!["g(X)"]);
        assert_eq!(b.children[0].truth, Truth::Succeeded);
        assert_eq!(labels(&b.children[0]), vec!["g(2)"]);
    }

    #[test]
    fn test_leaf_with_own_goal_is_resumed() {
        // the exit leaf q(1) differs from its frame q(X), so it is the target
        let result = rebuild("call: q(X)\nexit: q(1)\nredo(0): q(1)\nexit: q(1)");
        let q = &result.snapshots[1].tree.children[0];
        assert_eq!(q.label, "q(X)");
        assert_eq!(labels(q), vec!["q(1)"]);
        assert_eq!(q.children[0].truth, Truth::Succeeded);
        assert_eq!(labels(&q.children[0]), vec!["q(1)"]);
        assert_eq!(result.stats.approximate_redos, 0);
    }

    #[test]
    fn test_latest_signature_match_wins() {
        let trace = "\
call: a(1)
exit: a(1)
call: a(2)
exit: a(2)
redo(0): a(3)
exit: a(3)";
        let result = rebuild(trace);
        let root = &result.snapshots[1].tree;
        // BFS visits a(1), a(2), then their leaves; the a(2) leaf is last
        assert_eq!(labels(root), vec!["a(1)", "a(2)"]);
        assert_eq!(labels(&root.children[0]), vec!["a(1)"]);
        assert_eq!(labels(&root.children[1]), vec!["a(3)"]);
        assert_eq!(root.children[1].children[0].truth, Truth::Succeeded);
    }

    #[test]
    fn test_unresolved_redo_is_noop() {
        let trace = "call: p\nexit: p\nredo(0): zzz\ncall: q\nexit: q";
        let result = rebuild(trace);
        assert_eq!(result.snapshots.len(), 1);
        assert_eq!(result.snapshots[0].range, LineRange::new(0, 5));
        assert_eq!(labels(&result.snapshots[0].tree), vec!["p", "q"]);
        assert_eq!(result.stats.unresolved_redos, 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnresolvedRedo);
        assert!(result.is_lossy());
    }

    #[test]
    fn test_stray_exit_never_pops_past_root() {
        let result = rebuild("exit: p\nfail: q\ncall: r\nexit: r");
        let root = &result.snapshots[0].tree;
        assert_eq!(root.truth, Truth::Unknown);
        assert_eq!(labels(root), vec!["r"]);
        let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::StrayExit, DiagnosticKind::StrayExit]);
    }

    #[test]
    fn test_malformed_line_does_not_change_tree() {
        let clean = rebuild("call: p\ncall: q\nexit: q\nexit: p");
        let noisy = rebuild("call: p\nbogus line\ncall: q\nexit: q\nexit: p");
        assert_eq!(
            clean.final_snapshot().unwrap().tree,
            noisy.final_snapshot().unwrap().tree
        );
        assert_eq!(noisy.snapshots.len(), 1);
        assert_eq!(noisy.diagnostics.len(), 1);
        assert_eq!(noisy.diagnostics[0].line, 1);
    }

    #[test]
    fn test_ancestor_truncation_at_every_level() {
        let trace = "\
call: top
call: mid
call: leaf_a(X)
exit: leaf_a(1)
call: leaf_b
exit: leaf_b
exit: mid
call: after
fail: after
redo(0): leaf_a(X)
exit: leaf_a(2)";
        let result = rebuild(trace);
        let top = &result.snapshots[1].tree.children[0];
        // `after` (explored after mid) and `leaf_b` (after leaf_a) are dropped
        assert_eq!(labels(top), vec!["mid"]);
        assert_eq!(labels(&top.children[0]), vec!["leaf_a(X)"]);

        let tree = &result.tree;
        let cursor = result.current;
        assert_eq!(tree.node(cursor).label, "mid");
        for ancestor in tree.ancestry(cursor).windows(2) {
            let (child, parent) = (ancestor[0], ancestor[1]);
            assert_eq!(tree.children(parent).last(), Some(&child));
        }
    }

    #[test]
    fn test_incremental_builder_matches_rebuild() {
        let text = "call: p\nfail: p\nredo(0): p\nexit: p";
        let lines = normalize_lines(text);
        let events: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(i, l)| classify_line(l, i).unwrap())
            .collect();

        let mut builder = TreeBuilder::new();
        for (i, event) in events.iter().enumerate() {
            builder.apply(event, events.get(i + 1));
        }
        assert_eq!(builder.snapshots().len(), 1);
        assert_eq!(builder.current(), builder.tree().root());

        let incremental = builder.finish(lines.len());
        assert_eq!(incremental.snapshots, rebuild(text).snapshots);
    }

    #[test]
    fn test_prefix_sees_line_after_it() {
        let text = "call: p\ncall: q\nexit: q\ncall: r\nfail: r\nfail: p\nredo: p\ncall: s";
        let lines = normalize_lines(text);
        let events = classify_lines(&lines);

        // stop right after the redo; the next line still drives truncation
        let prefix = rebuild_prefix(&lines, &events, 7);
        let p = &prefix.final_snapshot().unwrap().tree.children[0];
        assert!(p.children.is_empty());
        assert_eq!(prefix.stats.lines, 7);

        let full = rebuild_prefix(&lines, &events, lines.len());
        assert_eq!(full.snapshots, rebuild(text).snapshots);
    }

    #[test]
    fn test_redo_never_resumes_root() {
        let result = rebuild("call: p
exit: p
redo(0): root
call: q
exit: q");
        assert_eq!(result.stats.unresolved_redos, 1);
        assert_eq!(result.snapshots.len(), 1);

        let resumed = rebuild("call: root
fail: root
redo(0): root
exit: root");
        assert_eq!(resumed.stats.resolved_redos, 1);
        let frame = &resumed.final_snapshot().unwrap().tree.children[0];
        assert_eq!(frame.label, "root");
        assert_eq!(frame.truth, Truth::Succeeded);
    }
}
