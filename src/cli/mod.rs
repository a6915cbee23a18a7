//! CLI command definitions and handlers

pub mod check;
pub mod export;
pub mod list;
pub mod show;
pub mod step;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::config::OutputConfig;
use crate::core::error::Result;
use crate::replay::output::{FormatOptions, OutputFormat};
use crate::replay::player::Replay;
use crate::replay::storage::load_trace;

const LONG_ABOUT: &str = r#"
Replay Prolog execution traces as call trees.

Reads a box-model trace (call / exit / fail / redo lines) and rebuilds the
call tree line by line. Every time the engine backtracks (a redo line) the
tree is frozen into a snapshot, so each alternative the search explored can
be inspected on its own.

TRACE FORMAT:
    call: member(X,[a,b]) @ /src/demo.pl:12
    exit(3): member(a,[a,b])
    redo(3): member(X,[a,b])
    fail: check(a)

    Blank lines are ignored. Lines that do not follow this grammar are
    skipped and reported by 'plreplay check'.

COMMANDS:
    plreplay list <trace>             One line per snapshot
    plreplay show <trace>             Render the final tree
    plreplay step <trace> -l <N>      Tree after line N
    plreplay check <trace>            Report skipped lines and lost redos
    plreplay export <trace>           Write snapshots to disk (JSON or DOT)

CONFIG:
    $PLREPLAY_HOME/config.toml (or the platform config directory)
    PLREPLAY_LOG=debug enables engine logging
"#;

/// Backtracking-aware Prolog trace replay
#[derive(Parser, Debug)]
#[command(name = "plreplay")]
#[command(author, version)]
#[command(about = "Replay Prolog execution traces as call trees")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the snapshots of a trace
    #[command(visible_alias = "ls")]
    List(list::ListArgs),

    /// Render one or more snapshot trees
    #[command(visible_alias = "s")]
    Show(show::ShowArgs),

    /// Show the tree after a given line
    Step(step::StepArgs),

    /// Report anomalies found while rebuilding
    Check(check::CheckArgs),

    /// Write snapshots to a directory
    #[command(visible_alias = "x")]
    Export(export::ExportArgs),
}

/// Output selection shared by the rendering commands
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatArgs {
    /// Output as JSON
    #[arg(long, conflicts_with_all = ["plain", "dot"])]
    pub json: bool,

    /// Output as plain text (no colors)
    #[arg(long, conflicts_with = "dot")]
    pub plain: bool,

    /// Output as DOT graph
    #[arg(long)]
    pub dot: bool,

    /// Disable ANSI colors
    #[arg(long)]
    pub no_color: bool,

    /// Elide labels longer than N characters (0 = never)
    #[arg(long, value_name = "N")]
    pub max_label_width: Option<usize>,
}

impl FormatArgs {
    /// Flags win over the configured default format
    pub fn output_format(&self, config: &OutputConfig) -> Result<OutputFormat> {
        if self.json {
            Ok(OutputFormat::Json)
        } else if self.dot {
            Ok(OutputFormat::Dot)
        } else if self.plain {
            Ok(OutputFormat::Plain)
        } else {
            config.output_format()
        }
    }

    pub fn options(&self, config: &OutputConfig) -> FormatOptions {
        let mut options = FormatOptions::from(config);
        if self.no_color {
            options.color = false;
        }
        if let Some(width) = self.max_label_width {
            options.max_label_width = width;
        }
        options
    }
}

/// Load and rebuild a trace file
pub(crate) fn open_trace(path: &Path) -> Result<Replay> {
    let text = load_trace(path)?;
    let replay = Replay::new(&text);
    info!(
        path = %path.display(),
        lines = replay.lines().len(),
        snapshots = replay.snapshots().len(),
        "Opened trace"
    );
    Ok(replay)
}

/// Print rendered output, ending with exactly one newline
pub(crate) fn emit(output: &str) {
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}
