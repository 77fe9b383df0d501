//! List rooms command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use hotelbook::RoomFilter;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Minimum price per night
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price per night
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum number of guests
    #[arg(long)]
    pub capacity: Option<u32>,

    /// Include inactive rooms
    #[arg(long)]
    pub all: bool,

    /// Sort key: price_per_night, capacity or room_number (prefix with - to reverse)
    #[arg(long, allow_hyphen_values = true)]
    pub ordering: Option<String>,
}

pub async fn run(args: ListArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;

    let filter = RoomFilter {
        min_price: args.min_price,
        max_price: args.max_price,
        capacity: args.capacity,
        is_active: if args.all { None } else { Some(true) },
        ordering: args.ordering,
    };

    let page = client
        .list_rooms(&filter)
        .await
        .map_err(session::explain)
        .context("Failed to list rooms")?;

    if global.json {
        return output::json_pretty(&page.results);
    }

    if page.is_empty() {
        output::note("No rooms found.");
        return Ok(());
    }

    for room in &page.results {
        output::room_row(room);
    }

    if let Some(count) = page.count
        && page.next.is_some()
    {
        eprintln!();
        eprintln!(
            "{}",
            format!("Showing {} of {} rooms", page.results.len(), count).dimmed()
        );
    }

    Ok(())
}
