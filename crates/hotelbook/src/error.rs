//! Error types for the hotelbook library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, input validation and credential storage
//! errors.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The unified error type for hotelbook operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, malformed response).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing or expired credentials).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the Booking API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential store errors.
    #[error("credential storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns true if the caller must treat the user as logged out.
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            Error::Auth(AuthError::NotAuthenticated | AuthError::SessionExpired) => true,
            Error::Api(api) => api.status == 401,
            _ => false,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No access token is stored.
    #[error("not logged in")]
    NotAuthenticated,

    /// The access token expired and could not be refreshed.
    #[error("session expired, log in again")]
    SessionExpired,

    /// The server rejected the supplied username or password.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// A non-success response from the Booking API.
///
/// The backend answers errors either with a `detail`/`error` message or
/// with a map of field names to validation messages.
#[derive(Debug, Default)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Top-level error message, if present.
    pub detail: Option<String>,
    /// Validation messages keyed by field name.
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    /// Create a new API error without a body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Build an API error from a JSON error body.
    pub fn from_body(status: u16, body: &serde_json::Value) -> Self {
        let mut error = Self::new(status);

        let serde_json::Value::Object(map) = body else {
            if let Some(text) = body.as_str() {
                error.detail = Some(text.to_string());
            }
            return error;
        };

        for (key, value) in map {
            if (key == "detail" || key == "error")
                && error.detail.is_none()
                && let Some(text) = value.as_str()
            {
                error.detail = Some(text.to_string());
                continue;
            }

            let messages = match value {
                serde_json::Value::Array(items) => items.iter().map(message_text).collect(),
                other => vec![message_text(other)],
            };
            error.fields.insert(key.clone(), messages);
        }

        error
    }

    /// Returns the messages reported for a field.
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }
}

fn message_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        for (field, messages) in &self.fields {
            write!(f, "; {}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Request URL could not be resolved.
    #[error("invalid request URL '{value}': {reason}")]
    RequestUrl { value: String, reason: String },

    /// Header name or value is not valid HTTP.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// A form field failed client-side validation.
    #[error("{field}: {reason}")]
    Field { field: &'static str, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Stored credentials could not be parsed or serialized.
    #[error("malformed credentials in {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    /// A store operation did not run to completion.
    #[error("credential store operation interrupted: {message}")]
    Interrupted { message: String },
}
