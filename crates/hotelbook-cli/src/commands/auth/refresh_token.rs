//! Refresh token command implementation.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(_args: RefreshTokenArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;
    session::require_login(&client)?;

    eprintln!("{}", "Refreshing access token...".dimmed());

    if !client.gateway().refresh_access_token().await? {
        bail!("Token refresh failed. Run 'hotelbook auth login' to sign in again.");
    }

    output::success("Access token refreshed");
    Ok(())
}
