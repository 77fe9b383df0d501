//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use hotelbook::Credentials;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "HOTELBOOK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;
    let credentials = Credentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    client
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("Username", credentials.username());
    output::field("API", client.gateway().base_url().as_str());

    Ok(())
}
