//! hotelbook - command-line client for the hotel booking API.
//!
//! A thin wrapper over the `hotelbook` library. Tokens are kept in a
//! credentials file between runs and renewed transparently when they expire.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, bookings, rooms};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &cli.global).await,
        Commands::Rooms(cmd) => rooms::handle(cmd, &cli.global).await,
        Commands::Bookings(cmd) => bookings::handle(cmd, &cli.global).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so `--json` output stays parseable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
