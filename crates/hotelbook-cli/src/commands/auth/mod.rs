//! Account and session subcommands.

mod change_password;
mod login;
mod logout;
mod refresh_token;
mod register;
mod update_profile;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::GlobalArgs;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Create an account and log in
    Register(register::RegisterArgs),

    /// Log in and store the session tokens
    Login(login::LoginArgs),

    /// Log out and forget the session tokens
    Logout(logout::LogoutArgs),

    /// Display the logged-in user
    Whoami(whoami::WhoamiArgs),

    /// Exchange the refresh token for a new access token
    RefreshToken(refresh_token::RefreshTokenArgs),

    /// Change the account password
    ChangePassword(change_password::ChangePasswordArgs),

    /// Update name, email or phone
    UpdateProfile(update_profile::UpdateProfileArgs),
}

pub async fn handle(cmd: AuthCommand, global: &GlobalArgs) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Register(args) => register::run(args, global).await,
        AuthSubcommand::Login(args) => login::run(args, global).await,
        AuthSubcommand::Logout(args) => logout::run(args, global).await,
        AuthSubcommand::Whoami(args) => whoami::run(args, global).await,
        AuthSubcommand::RefreshToken(args) => refresh_token::run(args, global).await,
        AuthSubcommand::ChangePassword(args) => change_password::run(args, global).await,
        AuthSubcommand::UpdateProfile(args) => update_profile::run(args, global).await,
    }
}
