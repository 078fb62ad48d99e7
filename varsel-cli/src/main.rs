//! ## varsel-cli
//! **Operational frontend for the Varsel detection engine**
//!
//! Streams NDJSON events (one `{type, payload, ts}` object per line) from a
//! file or stdin through the engine and emits alerts as NDJSON on stdout.
//! Logs go to stderr so piped alert output stays clean.

use clap::Parser;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(run_args) => commands::run_stream_mode(run_args).await,
    }
}
