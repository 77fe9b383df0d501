//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL of the Booking API server.
///
/// The URL must be absolute and use HTTPS (plain HTTP is accepted only for
/// localhost). Request paths are resolved against it the way a browser
/// resolves links on a page served from that origin.
///
/// # Example
///
/// ```
/// use hotelbook::ApiUrl;
///
/// let api = ApiUrl::new("https://hotel.example.com/").unwrap();
/// assert_eq!(
///     api.resolve("/api/v1/rooms/").unwrap().as_str(),
///     "https://hotel.example.com/api/v1/rooms/"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// Resolve a request target against this base.
    ///
    /// Absolute URLs are used as they are; root-relative paths such as
    /// `/api/v1/rooms/` replace the base path.
    pub fn resolve(&self, target: &str) -> Result<Url, Error> {
        let resolved = match Url::parse(target) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.0.join(target).map_err(|e| {
                InvalidInputError::RequestUrl {
                    value: target.to_string(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) => {
                return Err(InvalidInputError::RequestUrl {
                    value: target.to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
        };

        if !matches!(resolved.scheme(), "http" | "https") {
            return Err(InvalidInputError::RequestUrl {
                value: target.to_string(),
                reason: "only http and https URLs can be requested".to_string(),
            }
            .into());
        }

        Ok(resolved)
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        // Must be HTTPS (or HTTP for localhost)
        let scheme = url.scheme();
        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
            }
            .into());
        }

        if url.host_str().is_none() {
            return Err(InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let api = ApiUrl::new("https://hotel.example.com").unwrap();
        assert_eq!(api.host(), Some("hotel.example.com"));
    }

    #[test]
    fn valid_localhost_http() {
        let api = ApiUrl::new("http://localhost:8000").unwrap();
        assert_eq!(api.host(), Some("localhost"));
    }

    #[test]
    fn resolves_root_relative_path() {
        let api = ApiUrl::new("http://127.0.0.1:8000/frontend/").unwrap();
        assert_eq!(
            api.resolve("/api/v1/auth/me/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/v1/auth/me/"
        );
    }

    #[test]
    fn keeps_absolute_url() {
        let api = ApiUrl::new("https://hotel.example.com").unwrap();
        assert_eq!(
            api.resolve("https://other.example.com/api/v1/rooms/?capacity=2")
                .unwrap()
                .as_str(),
            "https://other.example.com/api/v1/rooms/?capacity=2"
        );
    }

    #[test]
    fn rejects_non_http_target() {
        let api = ApiUrl::new("https://hotel.example.com").unwrap();
        assert!(api.resolve("file:///etc/passwd").is_err());
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ApiUrl::new("http://hotel.example.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ApiUrl::new("/api/v1/").is_err());
    }
}
