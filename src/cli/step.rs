//! Step command implementation

use crate::cli::{emit, open_trace, FormatArgs};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::replay::output::{create_formatter, OutputFormat};
use crate::replay::player::{Replay, Step};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the step command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    plreplay step trace.txt -l 12        Tree after processing line 12
    plreplay step trace.txt --all        Every intermediate tree, line by line
    plreplay step trace.txt -l 12 --json JSON with line, snapshot and tree

Lines are counted after blank lines are removed, starting at 1.")]
pub struct StepArgs {
    /// Trace file
    pub trace: PathBuf,

    /// Line to stop at (1-based)
    #[arg(short, long, value_name = "N", required_unless_present = "all")]
    pub line: Option<usize>,

    /// Step through every line
    #[arg(long, conflicts_with = "line")]
    pub all: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

/// State after the 1-based `line`; errors name the line as typed
fn state_at_line(replay: &Replay, line: usize) -> Result<Step> {
    let total = replay.lines().len();
    match line.checked_sub(1) {
        Some(index) => replay.state_at(index).map_err(|err| match err {
            Error::LineOutOfRange { .. } => Error::LineOutOfRange { line, total },
            other => other,
        }),
        None => Err(Error::LineOutOfRange { line, total }),
    }
}

/// Run the step command
pub fn run(args: StepArgs, config: &Config) -> Result<()> {
    let mut replay = open_trace(&args.trace)?;
    let format = args.format.output_format(&config.output)?;
    let formatter = create_formatter(format, args.format.options(&config.output));

    if !args.all {
        let step = state_at_line(&replay, args.line.unwrap_or(0))?;
        emit(&formatter.format_step(&step));
        return Ok(());
    }

    let steps: Vec<Step> = std::iter::from_fn(|| replay.step()).collect();
    if format == OutputFormat::Json {
        emit(&serde_json::to_string_pretty(&steps)?);
    } else {
        let rendered: Vec<String> = steps.iter().map(|s| formatter.format_step(s)).collect();
        emit(&rendered.join("\n"));
    }

    Ok(())
}
