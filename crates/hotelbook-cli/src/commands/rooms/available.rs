//! Available rooms command implementation.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct AvailableArgs {
    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: NaiveDate,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: NaiveDate,
}

pub async fn run(args: AvailableArgs, global: &GlobalArgs) -> Result<()> {
    if args.check_out <= args.check_in {
        bail!("--check-out must be after --check-in");
    }

    let client = session::connect(global)?;

    let availability = client
        .available_rooms(args.check_in, args.check_out)
        .await
        .map_err(session::explain)
        .context("Failed to check availability")?;

    if global.json {
        return output::json_pretty(&availability);
    }

    if availability.available_rooms.is_empty() {
        output::note("No rooms available for these dates.");
        return Ok(());
    }

    output::field(
        "Available",
        &format!(
            "{} rooms, {} → {}",
            availability.available_rooms_count, availability.check_in, availability.check_out
        ),
    );
    println!();
    for room in &availability.available_rooms {
        output::room_row(room);
    }

    Ok(())
}
