//! Booking subcommands. All of them need a logged-in session.

mod cancel;
mod create;
mod list;
mod show;
mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::GlobalArgs;

#[derive(Args, Debug)]
pub struct BookingsCommand {
    #[command(subcommand)]
    pub command: BookingsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BookingsSubcommand {
    /// List your bookings
    List(list::ListArgs),

    /// Show a single booking
    Show(show::ShowArgs),

    /// Book a room
    Create(create::CreateArgs),

    /// Change the dates of a booking
    Update(update::UpdateArgs),

    /// Cancel a booking
    Cancel(cancel::CancelArgs),
}

pub async fn handle(cmd: BookingsCommand, global: &GlobalArgs) -> Result<()> {
    match cmd.command {
        BookingsSubcommand::List(args) => list::run(args, global).await,
        BookingsSubcommand::Show(args) => show::run(args, global).await,
        BookingsSubcommand::Create(args) => create::run(args, global).await,
        BookingsSubcommand::Update(args) => update::run(args, global).await,
        BookingsSubcommand::Cancel(args) => cancel::run(args, global).await,
    }
}
