//! token-decoder: verify signed tokens from the command line.
//!
//! Entry point for the application. Parses CLI arguments and delegates
//! to the appropriate command handler.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod display;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (warnings only by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Parse CLI arguments and dispatch to the appropriate command handler.
///
/// Returns to `main` instead of calling `process::exit`, so destructors
/// (including `Zeroizing`) run before the process ends.
fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Decode(args) => commands::decode::execute(args),
        Commands::Resolve(args) => commands::resolve::execute(args),
    }
}
