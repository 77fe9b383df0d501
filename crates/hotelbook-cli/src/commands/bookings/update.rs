//! Update booking command implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;

use hotelbook::BookingDates;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Booking ID
    pub id: u64,

    /// New arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: Option<NaiveDate>,

    /// New departure date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: Option<NaiveDate>,
}

pub async fn run(args: UpdateArgs, global: &GlobalArgs) -> Result<()> {
    let dates = BookingDates {
        check_in: args.check_in,
        check_out: args.check_out,
    };
    dates.validate()?;

    let client = session::connect(global)?;
    session::require_login(&client)?;

    let booking = client
        .update_booking(args.id, &dates)
        .await
        .map_err(session::explain)
        .with_context(|| format!("Failed to update booking {}", args.id))?;

    if global.json {
        return output::json_pretty(&booking);
    }

    output::success("Booking updated");
    println!();
    output::booking(&booking);
    Ok(())
}
