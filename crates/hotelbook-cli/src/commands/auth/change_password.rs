//! Change password command implementation.

use anyhow::{Context, Result};
use clap::Args;

use hotelbook::PasswordChange;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ChangePasswordArgs {
    /// Current password
    #[arg(long)]
    pub old_password: String,

    /// New password
    #[arg(long)]
    pub new_password: String,
}

pub async fn run(args: ChangePasswordArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;
    session::require_login(&client)?;

    let change = PasswordChange::new(args.old_password, args.new_password);
    let message = client
        .change_password(&change)
        .await
        .map_err(session::explain)
        .context("Failed to change password")?;

    if message.is_empty() {
        output::success("Password changed");
    } else {
        output::success(&message);
    }
    Ok(())
}
