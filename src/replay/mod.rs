//! Prolog Trace Replay - Backtracking-Aware Call Tree Reconstruction
//!
//! This module rebuilds the call tree of a resolution trace line by line:
//! - Event classification of `call`/`exit`/`fail`/`redo` lines
//! - Functor signatures for fuzzy redo matching
//! - Arena call tree with frozen snapshot copies
//! - Redo resolution with sibling and ancestor truncation
//! - Snapshot recording at every backtracking boundary
//! - Navigation, rendering and export of the results
//!
//! @module replay

pub mod builder;
pub mod diagnostics;
pub mod event;
pub mod output;
pub mod player;
pub mod recorder;
pub mod signature;
pub mod storage;
pub mod tree;

// =============================================================================
// RE-EXPORTS: Events (event.rs)
// =============================================================================

pub use event::{classify_line, classify_lines, normalize_lines, Event, EventKind, FAIL_SENTINEL};

// =============================================================================
// RE-EXPORTS: Tree (tree.rs, signature.rs)
// =============================================================================

pub use signature::Signature;
pub use tree::{CallTree, Node, NodeId, SnapshotNode, Truth, ROOT_LABEL};

// =============================================================================
// RE-EXPORTS: Builder (builder.rs, recorder.rs, diagnostics.rs)
// =============================================================================

pub use builder::{rebuild, rebuild_lines, rebuild_prefix, BuildStats, Reconstruction, TreeBuilder};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use recorder::{LineRange, Snapshot, SnapshotRecorder, Termination};

// =============================================================================
// RE-EXPORTS: Navigation and Output (player.rs, output/, storage.rs)
// =============================================================================

pub use output::{
    create_formatter, AsciiFormatter, CheckReport, DotFormatter, FormatOptions, JsonFormatter,
    OutputFormat, PlainFormatter, ReplayFormatter, SnapshotSummary,
};
pub use player::{Replay, Step};
pub use storage::{export_snapshots, load_trace, ExportManifest, ExportOptions, ExportedSnapshot};
