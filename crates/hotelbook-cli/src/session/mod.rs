//! Client construction and session checks shared by commands.

pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use hotelbook::{ApiUrl, BookingClient, ClientConfig, CredentialStore, FileStore};
use tracing::debug;

use crate::cli::GlobalArgs;

/// Build a client backed by the credentials file.
pub fn connect(global: &GlobalArgs) -> Result<BookingClient> {
    let api = ApiUrl::new(&global.api).context("Invalid API URL")?;

    let mut config = ClientConfig::new(api)
        .with_user_agent(format!("hotelbook-cli/{}", env!("HOTELBOOK_VERSION")));
    if let Some(secs) = global.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let path = storage::credentials_path(global.credentials.as_deref())?;
    debug!(path = %path.display(), "Using credentials file");

    BookingClient::connect(config, Arc::new(FileStore::new(path)))
        .context("Failed to create API client")
}

/// Fail early when no tokens are stored at all.
pub fn require_login(client: &BookingClient) -> Result<()> {
    let store = client.gateway().store();
    if store.access_token()?.is_none() && store.refresh_token()?.is_none() {
        bail!("Not logged in. Run 'hotelbook auth login' first.");
    }
    Ok(())
}

/// Turn an expired session into an error that tells the user what to do.
pub fn explain(err: hotelbook::Error) -> anyhow::Error {
    if err.is_unauthenticated() {
        anyhow!("{}. Run 'hotelbook auth login' to sign in again.", err)
    } else {
        err.into()
    }
}
