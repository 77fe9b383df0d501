//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use hotelbook::Registration;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "HOTELBOOK_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub password_confirm: Option<String>,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    #[arg(long, default_value = "")]
    pub phone: String,
}

pub async fn run(args: RegisterArgs, global: &GlobalArgs) -> Result<()> {
    let client = session::connect(global)?;

    let mut form = Registration::new(&args.username, &args.email, &args.password);
    if let Some(confirm) = args.password_confirm {
        form.password_confirm = confirm;
    }
    form.first_name = args.first_name;
    form.last_name = args.last_name;
    form.phone = args.phone;

    eprintln!("{}", "Creating account...".dimmed());

    let user = client
        .register(&form)
        .await
        .context("Failed to register")?;

    if global.json {
        return output::json_pretty(&user);
    }

    output::success("Account created, you are now logged in");
    println!();
    output::user(&user);

    Ok(())
}
