//! Authentication types and credential storage.
//!
//! Tokens are persisted through a [`CredentialStore`], which the
//! [`Gateway`](crate::Gateway) reads before every request and updates when
//! it refreshes an expired access token.

mod credentials;
mod file_store;
mod store;
mod tokens;

pub use credentials::{Credentials, MIN_PASSWORD_LEN, PasswordChange, Registration};
pub use file_store::FileStore;
pub use store::{CredentialStore, MemoryStore, TokenSlot};
pub use tokens::{AccessToken, RefreshToken, TokenPair};
