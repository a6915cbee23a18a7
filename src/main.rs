//! plreplay CLI entry point

use clap::Parser;
use plreplay::cli::{Cli, Commands};
use plreplay::core::config::Config;
use plreplay::core::error::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("PLREPLAY_LOG"))
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::List(args) => plreplay::cli::list::run(args, &config),
        Commands::Show(args) => plreplay::cli::show::run(args, &config),
        Commands::Step(args) => plreplay::cli::step::run(args, &config),
        Commands::Check(args) => plreplay::cli::check::run(args, &config),
        Commands::Export(args) => plreplay::cli::export::run(args, &config),
    }
}
