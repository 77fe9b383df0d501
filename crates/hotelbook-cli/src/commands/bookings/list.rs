//! List bookings command implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use hotelbook::{BookingFilter, BookingPeriod, BookingStatus};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Period {
    Past,
    Upcoming,
    Current,
}

impl From<Period> for BookingPeriod {
    fn from(period: Period) -> Self {
        match period {
            Period::Past => BookingPeriod::Past,
            Period::Upcoming => BookingPeriod::Upcoming,
            Period::Current => BookingPeriod::Current,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only bookings with this status (active or cancelled)
    #[arg(long)]
    pub status: Option<BookingStatus>,

    /// Only past, upcoming or current stays
    #[arg(long, value_enum)]
    pub period: Option<Period>,

    /// Check-in on or after this date
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Check-out on or before this date
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Sort key: created_at, check_in, check_out or total_price (prefix with - to reverse)
    #[arg(long, allow_hyphen_values = true)]
    pub ordering: Option<String>,
}

pub async fn run(args: ListArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;
    session::require_login(&client)?;

    let filter = BookingFilter {
        status: args.status,
        period: args.period.map(BookingPeriod::from),
        check_in_after: args.from,
        check_out_before: args.until,
        ordering: args.ordering,
        ..BookingFilter::default()
    };

    let page = client
        .list_bookings(&filter)
        .await
        .map_err(session::explain)
        .context("Failed to list bookings")?;

    if global.json {
        return output::json_pretty(&page.results);
    }

    if page.is_empty() {
        output::note("No bookings found.");
        return Ok(());
    }

    for booking in &page.results {
        output::booking_row(booking);
    }

    Ok(())
}
