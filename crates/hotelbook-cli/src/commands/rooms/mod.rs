//! Room subcommands.

mod available;
mod list;
mod show;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::GlobalArgs;

#[derive(Args, Debug)]
pub struct RoomsCommand {
    #[command(subcommand)]
    pub command: RoomsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RoomsSubcommand {
    /// List rooms
    List(list::ListArgs),

    /// Show a single room
    Show(show::ShowArgs),

    /// List rooms free for a date range
    Available(available::AvailableArgs),
}

pub async fn handle(cmd: RoomsCommand, global: &GlobalArgs) -> Result<()> {
    match cmd.command {
        RoomsSubcommand::List(args) => list::run(args, global).await,
        RoomsSubcommand::Show(args) => show::run(args, global).await,
        RoomsSubcommand::Available(args) => available::run(args, global).await,
    }
}
