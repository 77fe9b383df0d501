//! Token types for JWT authentication.

use std::fmt;

use serde::Deserialize;

/// An access token for authenticated API requests.
///
/// Access tokens are short-lived JWTs sent as `Authorization: Bearer <token>`.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value.
    ///
    /// # Security
    ///
    /// Use only when constructing authorization headers or persisting the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Hide token value in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token for obtaining new access tokens.
///
/// Refresh tokens are longer-lived and only ever sent to the token refresh
/// and logout endpoints.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value.
    ///
    /// # Security
    ///
    /// Use only when constructing refresh/logout requests or persisting the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Hide token value in Debug output
impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// The credential pair issued on login and registration.
///
/// Deserializes from the backend's `{"access": ..., "refresh": ...}` shape.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "access")]
    pub access_token: AccessToken,
    #[serde(rename = "refresh")]
    pub refresh_token: RefreshToken,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken::new(access_token),
            refresh_token: RefreshToken::new(refresh_token),
        }
    }
}
