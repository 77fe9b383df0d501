//! Client configuration.

use std::time::Duration;

use crate::error::{Error, TransportError};
use crate::types::ApiUrl;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("hotelbook/", env!("CARGO_PKG_VERSION"));

/// Settings for the HTTP transport underneath the [`Gateway`](crate::Gateway).
///
/// The gateway itself never times a request out; `timeout` is handed to the
/// HTTP client and applies to each individual request it sends.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hotelbook::{ApiUrl, ClientConfig};
///
/// let config = ClientConfig::new(ApiUrl::new("http://localhost:8000")?)
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(config.timeout, Some(Duration::from_secs(10)));
/// # Ok::<(), hotelbook::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: ApiUrl,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|e| {
            TransportError::Http {
                message: format!("failed to build HTTP client: {}", e),
            }
            .into()
        })
    }
}
