//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::bookings::BookingsCommand;
use crate::commands::rooms::RoomsCommand;

/// Command-line client for the hotel booking API.
#[derive(Parser, Debug)]
#[command(name = "hotelbook")]
#[command(author, version = env!("HOTELBOOK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Booking API base URL
    #[arg(
        long,
        env = "HOTELBOOK_API",
        default_value = "http://localhost:8000",
        global = true
    )]
    pub api: String,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Credentials file (defaults to the user data directory)
    #[arg(long, env = "HOTELBOOK_CREDENTIALS", global = true)]
    pub credentials: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account and session operations
    Auth(AuthCommand),

    /// Browse rooms
    Rooms(RoomsCommand),

    /// Manage your bookings
    Bookings(BookingsCommand),
}
