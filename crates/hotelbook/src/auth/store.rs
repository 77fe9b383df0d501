//! Credential storage.
//!
//! Credentials live in two named slots, `access_token` and `refresh_token`.
//! A store only knows how to get, set and remove a slot; the provided
//! methods on [`CredentialStore`] build the typed token operations on top.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::Result;

use super::tokens::{AccessToken, RefreshToken, TokenPair};

/// One of the two credential slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenSlot {
    Access,
    Refresh,
}

impl TokenSlot {
    /// Both slots, in the order they are cleared.
    pub const ALL: [TokenSlot; 2] = [TokenSlot::Access, TokenSlot::Refresh];

    /// Returns the fixed storage key of this slot.
    pub const fn key(self) -> &'static str {
        match self {
            TokenSlot::Access => "access_token",
            TokenSlot::Refresh => "refresh_token",
        }
    }
}

impl fmt::Display for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Persistent storage for the credential pair.
///
/// Stores are shared between concurrent requests, so every method takes
/// `&self`. An absent or empty slot means "no token".
pub trait CredentialStore: Send + Sync {
    /// Read a slot.
    fn get(&self, slot: TokenSlot) -> Result<Option<String>>;

    /// Overwrite a slot.
    fn set(&self, slot: TokenSlot, value: &str) -> Result<()>;

    /// Remove a slot. Removing an absent slot is not an error.
    fn remove(&self, slot: TokenSlot) -> Result<()>;

    fn access_token(&self) -> Result<Option<AccessToken>> {
        Ok(self
            .get(TokenSlot::Access)?
            .filter(|token| !token.is_empty())
            .map(AccessToken::new))
    }

    fn refresh_token(&self) -> Result<Option<RefreshToken>> {
        Ok(self
            .get(TokenSlot::Refresh)?
            .filter(|token| !token.is_empty())
            .map(RefreshToken::new))
    }

    /// Store a freshly issued credential pair.
    fn set_tokens(&self, tokens: &TokenPair) -> Result<()> {
        self.set(TokenSlot::Access, tokens.access_token.as_str())?;
        self.set(TokenSlot::Refresh, tokens.refresh_token.as_str())
    }

    /// Replace only the access token.
    fn set_access_token(&self, token: &AccessToken) -> Result<()> {
        self.set(TokenSlot::Access, token.as_str())
    }

    /// Remove both tokens.
    fn clear(&self) -> Result<()> {
        for slot in TokenSlot::ALL {
            self.remove(slot)?;
        }
        Ok(())
    }

    /// A user is authenticated exactly when an access token is stored.
    fn is_authenticated(&self) -> Result<bool> {
        Ok(self.access_token()?.is_some())
    }
}

/// In-process credential store.
#[derive(Default)]
pub struct MemoryStore {
    slots: RwLock<HashMap<TokenSlot, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given tokens.
    pub fn with_tokens(access_token: Option<&str>, refresh_token: Option<&str>) -> Self {
        let mut slots = HashMap::new();
        if let Some(token) = access_token {
            slots.insert(TokenSlot::Access, token.to_string());
        }
        if let Some(token) = refresh_token {
            slots.insert(TokenSlot::Refresh, token.to_string());
        }
        Self {
            slots: RwLock::new(slots),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, slot: TokenSlot) -> Result<Option<String>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(&slot).cloned())
    }

    fn set(&self, slot: TokenSlot, value: &str) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.insert(slot, value.to_string());
        Ok(())
    }

    fn remove(&self, slot: TokenSlot) -> Result<()> {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.remove(&slot);
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
