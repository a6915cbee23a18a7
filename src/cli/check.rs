//! Check command implementation

use crate::cli::{emit, open_trace, FormatArgs};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::replay::diagnostics::DiagnosticKind;
use crate::replay::output::{create_formatter, CheckReport};
use clap::Args;
use std::path::PathBuf;
use tracing::warn;

/// Arguments for the check command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    plreplay check trace.txt             Report anomalies
    plreplay check trace.txt --strict    Exit non-zero if lines or redos were lost
    plreplay check trace.txt --json      Machine-readable report

KINDS:
    unparseable       Line does not follow the trace grammar (skipped)
    unresolved_redo   No frame matches the redo goal (ignored)
    stray_exit        exit/fail with no open call (ignored)
    approximate_redo  Frame matched by name/arity only (informational)")]
pub struct CheckArgs {
    /// Trace file
    pub trace: PathBuf,

    /// Fail when any line or redo had to be dropped
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub format: FormatArgs,
}

/// Run the check command
pub fn run(args: CheckArgs, config: &Config) -> Result<()> {
    let replay = open_trace(&args.trace)?;
    let report = CheckReport::new(args.trace.display().to_string(), replay.reconstruction());

    let formatter = create_formatter(
        args.format.output_format(&config.output)?,
        args.format.options(&config.output),
    );
    emit(&formatter.format_check(&report));

    if args.strict && report.lossy {
        let lossy = report
            .diagnostics
            .iter()
            .filter(|d| d.kind.is_lossy())
            .count();
        let approximate = report
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::ApproximateRedo)
            .count();
        warn!(lossy, approximate, "Strict check failed");
        return Err(Error::CheckFailed {
            message: format!("{} lossy diagnostic(s) in {}", lossy, report.source),
        });
    }

    Ok(())
}
