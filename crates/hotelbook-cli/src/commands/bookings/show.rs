//! Show booking command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Booking ID
    pub id: u64,
}

pub async fn run(args: ShowArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;
    session::require_login(&client)?;

    let booking = client
        .booking(args.id)
        .await
        .map_err(session::explain)
        .with_context(|| format!("Failed to fetch booking {}", args.id))?;

    if global.json {
        return output::json_pretty(&booking);
    }

    output::booking(&booking);
    Ok(())
}
