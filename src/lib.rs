//! plreplay - Backtracking-aware Prolog trace replay
//!
//! Rebuilds the call tree of a Prolog execution trace line by line and keeps
//! an immutable snapshot of the tree at every backtracking point.

pub mod cli;
pub mod core;
pub mod replay;

pub use core::config::Config;
pub use core::error::{Error, Result};
pub use replay::{rebuild, Reconstruction, Replay, Snapshot, SnapshotNode, Truth};
