//! Cancel booking command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Booking ID
    pub id: u64,
}

pub async fn run(args: CancelArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;
    session::require_login(&client)?;

    let cancelled = client
        .cancel_booking(args.id)
        .await
        .map_err(session::explain)
        .with_context(|| format!("Failed to cancel booking {}", args.id))?;

    if global.json {
        return output::json_pretty(&cancelled);
    }

    if cancelled.message.is_empty() {
        output::success("Booking cancelled");
    } else {
        output::success(&cancelled.message);
    }
    println!();
    output::booking(&cancelled.booking);
    Ok(())
}
