//! Export command implementation

use crate::cli::open_trace;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::replay::output::OutputFormat;
use crate::replay::storage::{export_snapshots, manifest_path, ExportOptions};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the export command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    plreplay export trace.txt                  JSON snapshots into ./snapshots
    plreplay export trace.txt -o out/          Choose the directory
    plreplay export trace.txt --dot            One DOT graph per snapshot
    plreplay export trace.txt --successful     Only successful alternatives

Every export also writes manifest.json with the line range, closing event
and file name of each snapshot.")]
pub struct ExportArgs {
    /// Trace file
    pub trace: PathBuf,

    /// Output directory (default: [export] dir from config)
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Write DOT graphs instead of JSON
    #[arg(long)]
    pub dot: bool,

    /// Only snapshots whose first top-level call succeeded
    #[arg(long)]
    pub successful: bool,

    /// Compact JSON
    #[arg(long, conflicts_with = "dot")]
    pub compact: bool,
}

impl ExportArgs {
    fn options(&self, config: &Config) -> ExportOptions {
        ExportOptions {
            format: if self.dot {
                OutputFormat::Dot
            } else {
                OutputFormat::Json
            },
            pretty: config.export.pretty && !self.compact,
            successful_only: self.successful,
        }
    }
}

/// Run the export command
pub fn run(args: ExportArgs, config: &Config) -> Result<()> {
    let replay = open_trace(&args.trace)?;
    let dir = args.out.clone().unwrap_or_else(|| config.export.dir.clone());

    let manifest = export_snapshots(
        replay.reconstruction(),
        &args.trace.display().to_string(),
        &dir,
        args.options(config),
    )?;

    println!(
        "Exported {} of {} snapshots to {}",
        manifest.snapshots.len(),
        manifest.total_snapshots,
        dir.display()
    );
    println!("Manifest: {}", manifest_path(&dir).display());

    Ok(())
}
