//! Update profile command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use hotelbook::ProfileUpdate;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct UpdateProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

pub async fn run(args: UpdateProfileArgs, global: &GlobalArgs) -> Result<()> {
    let update = ProfileUpdate {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
    };
    if update.is_empty() {
        bail!("Nothing to update. Pass at least one of --first-name, --last-name, --email, --phone.");
    }

    let client = session::connect(global)?;
    session::require_login(&client)?;

    let updated = client
        .update_profile(&update)
        .await
        .map_err(session::explain)
        .context("Failed to update profile")?;

    if global.json {
        return output::json_pretty(&updated);
    }

    output::success("Profile updated");
    println!();
    for (label, value) in [
        ("First name", &updated.first_name),
        ("Last name", &updated.last_name),
        ("Email", &updated.email),
        ("Phone", &updated.phone),
    ] {
        if let Some(value) = value {
            output::field(label, value);
        }
    }
    Ok(())
}
