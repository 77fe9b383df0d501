//! Request descriptors and outcomes.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::{Error, InvalidInputError};

/// Method, headers and body of a gateway request.
///
/// The body is an already serialized payload; the gateway sends it verbatim.
///
/// # Example
///
/// ```
/// use hotelbook::RequestOptions;
///
/// let options = RequestOptions::post()
///     .header("X-Request-Id", "42")
///     .body(r#"{"room": 3}"#);
/// assert_eq!(options.method().as_str(), "POST");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    method: Method,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn patch() -> Self {
        Self::new(Method::PATCH)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Add a header. Later values for the same name win.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a pre-serialized body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, Error> {
        let body = serde_json::to_string(value).map_err(|e| InvalidInputError::Other {
            message: format!("failed to serialize request body: {}", e),
        })?;
        Ok(self.body(body))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body_str(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Default headers merged with the caller's.
    ///
    /// `Content-Type: application/json` is the default and the caller may
    /// replace it. `Authorization` is owned by the gateway, so a
    /// caller-supplied value is dropped.
    pub(crate) fn header_map(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &self.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| InvalidInputError::Header {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            if header_name == AUTHORIZATION {
                continue;
            }
            let header_value =
                HeaderValue::from_str(value).map_err(|e| InvalidInputError::Header {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

/// Result of a gateway request.
#[derive(Debug)]
pub enum Outcome {
    /// The server's response, whatever its status.
    Response(reqwest::Response),
    /// The access token expired and could not be refreshed. Both stored
    /// tokens have been cleared; the user must log in again.
    Unauthenticated,
}

impl Outcome {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Outcome::Unauthenticated)
    }

    /// Returns the response, or `None` for [`Outcome::Unauthenticated`].
    pub fn into_response(self) -> Option<reqwest::Response> {
        match self {
            Outcome::Response(response) => Some(response),
            Outcome::Unauthenticated => None,
        }
    }
}
