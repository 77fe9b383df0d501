//! File-backed credential store.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::Result;
use crate::error::StorageError;

use super::store::{CredentialStore, TokenSlot};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk layout: one JSON object keyed by slot name.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl StoredCredentials {
    fn slot_mut(&mut self, slot: TokenSlot) -> &mut Option<String> {
        match slot {
            TokenSlot::Access => &mut self.access_token,
            TokenSlot::Refresh => &mut self.refresh_token,
        }
    }

    fn slot(&self, slot: TokenSlot) -> Option<&String> {
        match slot {
            TokenSlot::Access => self.access_token.as_ref(),
            TokenSlot::Refresh => self.refresh_token.as_ref(),
        }
    }
}

/// Credential store persisted as a JSON file.
///
/// A missing file is an empty store. Writes take an exclusive lock on a
/// sibling `.lock` file so that several processes sharing the file do not
/// lose each other's updates. Each write replaces the file through a
/// renamed temp file, so reads need no lock. On Unix the file has mode 0600.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn io_error(&self, err: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }

    fn read(&self) -> Result<StoredCredentials> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoredCredentials::default()),
            Err(e) => return Err(self.io_error(e).into()),
        };

        if json.trim().is_empty() {
            return Ok(StoredCredentials::default());
        }

        serde_json::from_str(&json).map_err(|e| {
            StorageError::Format {
                path: self.path.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn write(&self, stored: &StoredCredentials) -> Result<()> {
        let json = serde_json::to_string_pretty(stored).map_err(|e| StorageError::Format {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        // Write atomically (temp file + rename); unlocked readers never see a partial file.
        let temp_path = self.temp_path();
        fs::write(&temp_path, json).map_err(|e| self.io_error(e))?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&temp_path)
                .map_err(|e| self.io_error(e))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&temp_path, perms).map_err(|e| self.io_error(e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Apply a change to the stored credentials under the file lock.
    fn update(&self, change: impl FnOnce(&mut StoredCredentials)) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.io_error(e))?;

        lock_file.lock_exclusive().map_err(|e| self.io_error(e))?;

        let result = self.read().and_then(|mut stored| {
            change(&mut stored);
            self.write(&stored)
        });

        lock_file.unlock().map_err(|e| self.io_error(e))?;

        result
    }
}

impl CredentialStore for FileStore {
    fn get(&self, slot: TokenSlot) -> Result<Option<String>> {
        Ok(self.read()?.slot(slot).cloned())
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn set(&self, slot: TokenSlot, value: &str) -> Result<()> {
        debug!(%slot, "storing token");
        self.update(|stored| *stored.slot_mut(slot) = Some(value.to_string()))
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove(&self, slot: TokenSlot) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        debug!(%slot, "removing token");
        self.update(|stored| *stored.slot_mut(slot) = None)
    }
}
