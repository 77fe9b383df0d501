//! Show room command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Room ID
    pub id: u64,
}

pub async fn run(args: ShowArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;

    let room = client
        .room(args.id)
        .await
        .map_err(session::explain)
        .with_context(|| format!("Failed to fetch room {}", args.id))?;

    if global.json {
        return output::json_pretty(&room);
    }

    output::room(&room);
    Ok(())
}
