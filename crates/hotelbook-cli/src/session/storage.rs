//! Location of the credentials file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Resolve the credentials file, defaulting to the user data directory.
pub fn credentials_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let dirs =
        ProjectDirs::from("", "", "hotelbook").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("credentials.json"))
}
