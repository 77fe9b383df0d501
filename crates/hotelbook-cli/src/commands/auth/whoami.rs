//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;
    session::require_login(&client)?;

    let user = client
        .profile()
        .await
        .map_err(session::explain)
        .context("Failed to fetch profile")?;

    if global.json {
        return output::json_pretty(&user);
    }

    output::user(&user);
    output::field("API", client.gateway().base_url().as_str());

    Ok(())
}
