//! Create booking command implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;

use hotelbook::NewBooking;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Room ID
    #[arg(long)]
    pub room: u64,

    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: NaiveDate,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: NaiveDate,
}

pub async fn run(args: CreateArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;
    session::require_login(&client)?;

    let new_booking = NewBooking::new(args.room, args.check_in, args.check_out);

    eprintln!(
        "{}",
        format!("Booking room {} for {} nights...", args.room, new_booking.nights()).dimmed()
    );

    let booking = client
        .create_booking(&new_booking)
        .await
        .map_err(session::explain)
        .context("Failed to create booking")?;

    if global.json {
        return output::json_pretty(&booking);
    }

    output::success("Booking created");
    println!();
    output::booking(&booking);
    Ok(())
}
