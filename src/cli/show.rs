//! Show command implementation
//!
//! Renders snapshot trees. Without a selector the final snapshot is shown.
//!
//! @module cli/show

use crate::cli::{emit, open_trace, FormatArgs};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::replay::output::{create_formatter, OutputFormat};
use crate::replay::player::Replay;
use crate::replay::recorder::Snapshot;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

// =============================================================================
// ARGS
// =============================================================================

/// Arguments for the show command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    plreplay show trace.txt                    Final tree
    plreplay show trace.txt -n 0               Tree before the first backtrack
    plreplay show trace.txt --all              Every snapshot in order
    plreplay show trace.txt --successful --dot Successful alternatives as a graph

OUTPUT FORMATS:
    plreplay show trace.txt --json             JSON (children only when present)
    plreplay show trace.txt --plain            Indented text, no colors
    plreplay show trace.txt --dot              DOT graph colored by outcome")]
pub struct ShowArgs {
    /// Trace file
    pub trace: PathBuf,

    /// Snapshot index (default: final snapshot)
    #[arg(short = 'n', long, value_name = "N", conflicts_with_all = ["all", "successful"])]
    pub snapshot: Option<usize>,

    /// Show every snapshot
    #[arg(long, conflicts_with = "successful")]
    pub all: bool,

    /// Show every snapshot whose first top-level call succeeded
    #[arg(long)]
    pub successful: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

impl ShowArgs {
    /// Snapshots picked by the selector flags
    fn select<'a>(&self, replay: &'a Replay) -> Result<Vec<&'a Snapshot>> {
        if self.all {
            return Ok(replay.snapshots().iter().collect());
        }
        if self.successful {
            return Ok(replay
                .snapshots()
                .iter()
                .filter(|s| s.tree.is_successful())
                .collect());
        }

        let index = self
            .snapshot
            .unwrap_or_else(|| replay.snapshots().len().saturating_sub(1));
        Ok(vec![replay.snapshot(index)?])
    }
}

// =============================================================================
// COMMAND
// =============================================================================

/// Run the show command
pub fn run(args: ShowArgs, config: &Config) -> Result<()> {
    let replay = open_trace(&args.trace)?;
    let selected = args.select(&replay)?;
    debug!(selected = selected.len(), "Selected snapshots");

    let format = args.format.output_format(&config.output)?;

    if let [snapshot] = selected.as_slice() {
        let formatter = create_formatter(format, args.format.options(&config.output));
        emit(&formatter.format_snapshot(snapshot));
        return Ok(());
    }

    if selected.is_empty() && format != OutputFormat::Json {
        eprintln!("No matching snapshots.");
        return Ok(());
    }

    match format {
        OutputFormat::Json => emit(&serde_json::to_string_pretty(&selected)?),
        OutputFormat::Dot => {
            let owned: Vec<Snapshot> = selected.into_iter().cloned().collect();
            let formatter = create_formatter(format, args.format.options(&config.output));
            emit(&formatter.format_listing(&owned));
        }
        OutputFormat::Ascii | OutputFormat::Plain => {
            let formatter = create_formatter(format, args.format.options(&config.output));
            let rendered: Vec<String> = selected
                .iter()
                .map(|s| formatter.format_snapshot(s))
                .collect();
            emit(&rendered.join("\n"));
        }
    }

    Ok(())
}
