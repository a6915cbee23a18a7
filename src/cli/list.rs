//! List command implementation

use crate::cli::{emit, open_trace, FormatArgs};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::replay::output::create_formatter;
use crate::replay::recorder::Snapshot;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the list command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    plreplay list trace.txt               One row per snapshot
    plreplay list trace.txt --successful  Only snapshots whose query succeeded
    plreplay list trace.txt --json        JSON summaries for tooling

COLUMNS:
    index, line range, what closed the snapshot, calls in the tree,
    outcome of the first top-level call")]
pub struct ListArgs {
    /// Trace file
    pub trace: PathBuf,

    /// Only snapshots whose first top-level call succeeded
    #[arg(long)]
    pub successful: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

/// Run the list command
pub fn run(args: ListArgs, config: &Config) -> Result<()> {
    let replay = open_trace(&args.trace)?;

    let snapshots: Vec<Snapshot> = replay
        .snapshots()
        .iter()
        .filter(|s| !args.successful || s.tree.is_successful())
        .cloned()
        .collect();

    let formatter = create_formatter(
        args.format.output_format(&config.output)?,
        args.format.options(&config.output),
    );
    emit(&formatter.format_listing(&snapshots));

    Ok(())
}
