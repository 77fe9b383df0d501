//! Authenticated request gateway.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::Result;
use crate::api::endpoints::TOKEN_REFRESH;
use crate::auth::{AccessToken, CredentialStore};
use crate::config::ClientConfig;
use crate::error::{Error, InvalidInputError, StorageError};
use crate::types::ApiUrl;

use super::request::{Outcome, RequestOptions};

/// Request body for the token refresh endpoint.
#[derive(Serialize)]
struct TokenRefreshRequest<'a> {
    refresh: &'a str,
}

/// Response from the token refresh endpoint.
#[derive(Deserialize)]
struct TokenRefreshResponse {
    access: AccessToken,
}

/// What a call that hit a 401 should do next.
enum Renewal {
    /// Retry once with this access token.
    Retry(AccessToken),
    /// Give up; the user is logged out.
    Failed,
}

/// Issues requests with the stored bearer token and renews it on expiry.
///
/// Every request carries `Authorization: Bearer <access token>` when an
/// access token is stored. A `401` answer triggers one token refresh and one
/// retry; if the refresh fails both tokens are cleared and the call returns
/// [`Outcome::Unauthenticated`].
///
/// Gateways are cheap to clone and share one credential store. Concurrent
/// calls that hit a `401` take turns on a refresh lock: the first one
/// refreshes, the others see the replaced access token and retry with it
/// without refreshing again.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use hotelbook::{ApiUrl, ClientConfig, Gateway, MemoryStore, Outcome, RequestOptions};
///
/// # async fn example() -> Result<(), hotelbook::Error> {
/// let config = ClientConfig::new(ApiUrl::new("http://localhost:8000")?);
/// let gateway = Gateway::new(config, Arc::new(MemoryStore::new()))?;
///
/// match gateway.request("/api/v1/rooms/", RequestOptions::get()).await? {
///     Outcome::Response(response) => println!("status {}", response.status()),
///     Outcome::Unauthenticated => println!("please log in again"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: reqwest::Client,
    base_url: ApiUrl,
    store: Arc<dyn CredentialStore>,
    refresh_lock: Mutex<()>,
}

impl Gateway {
    /// Create a gateway over the given credential store.
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let client = config.build_http_client()?;

        Ok(Self {
            inner: Arc::new(GatewayInner {
                client,
                base_url: config.base_url,
                store,
                refresh_lock: Mutex::new(()),
            }),
        })
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &ApiUrl {
        &self.inner.base_url
    }

    /// Returns the credential store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// Returns true if an access token is stored.
    pub fn is_authenticated(&self) -> Result<bool> {
        self.inner.store.is_authenticated()
    }

    /// Send a request with the stored access token.
    ///
    /// `url` is absolute or root-relative to the API base URL.
    ///
    /// # Errors
    ///
    /// Transport failures of the request itself are returned as errors and
    /// are not retried. A failed token refresh is not an error; it yields
    /// [`Outcome::Unauthenticated`].
    #[instrument(skip(self, options), fields(method = %options.method()))]
    pub async fn request(&self, url: &str, options: RequestOptions) -> Result<Outcome> {
        let target = self.inner.base_url.resolve(url)?;
        let mut headers = options.header_map()?;

        let sent_token = self.with_store(|store| store.access_token()).await?;
        if let Some(token) = &sent_token {
            set_bearer(&mut headers, token)?;
        }

        let response = self.send(&target, &options, headers.clone()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(Outcome::Response(response));
        }

        if self
            .with_store(|store| store.refresh_token())
            .await?
            .is_none()
        {
            debug!(%target, "unauthorized and no refresh token stored");
            return Ok(Outcome::Response(response));
        }

        match self.renew(sent_token.as_ref()).await? {
            Renewal::Retry(token) => {
                set_bearer(&mut headers, &token)?;
                debug!(%target, "retrying with renewed access token");

                let retried = self.send(&target, &options, headers).await?;
                if retried.status() == StatusCode::UNAUTHORIZED {
                    warn!(%target, "still unauthorized after token refresh");
                }
                Ok(Outcome::Response(retried))
            }
            Renewal::Failed => {
                self.with_store(|store| store.clear()).await?;
                info!("token refresh failed, credentials cleared");
                Ok(Outcome::Unauthenticated)
            }
        }
    }

    /// Send a request without credentials.
    ///
    /// For endpoints open to anonymous users. No token is attached, the
    /// store is not read and a `401` answer is returned as is.
    #[instrument(skip(self, options), fields(method = %options.method()))]
    pub async fn request_anonymous(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<reqwest::Response> {
        let target = self.inner.base_url.resolve(url)?;
        let headers = options.header_map()?;
        self.send(&target, &options, headers).await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Returns `false` without touching the network when no refresh token is
    /// stored, and `false` when the server rejects the refresh or cannot be
    /// reached. On success only the access token is replaced. Stored tokens
    /// are never cleared here.
    ///
    /// # Errors
    ///
    /// Only credential store failures are returned as errors.
    pub async fn refresh_access_token(&self) -> Result<bool> {
        let _guard = self.inner.refresh_lock.lock().await;
        self.try_refresh().await
    }

    /// Decide how a call that was answered with 401 continues.
    async fn renew(&self, sent_token: Option<&AccessToken>) -> Result<Renewal> {
        let _guard = self.inner.refresh_lock.lock().await;

        // Another call may have refreshed while this one waited for the lock.
        if let Some(current) = self.with_store(|store| store.access_token()).await?
            && sent_token != Some(&current)
        {
            debug!("access token already renewed by a concurrent request");
            return Ok(Renewal::Retry(current));
        }

        if !self.try_refresh().await? {
            return Ok(Renewal::Failed);
        }

        Ok(match self.with_store(|store| store.access_token()).await? {
            Some(token) => Renewal::Retry(token),
            None => Renewal::Failed,
        })
    }

    #[instrument(skip(self))]
    async fn try_refresh(&self) -> Result<bool> {
        let Some(refresh_token) = self.with_store(|store| store.refresh_token()).await? else {
            debug!("no refresh token stored");
            return Ok(false);
        };

        let url = self.inner.base_url.resolve(TOKEN_REFRESH)?;
        debug!(%url, "refreshing access token");

        let result = self
            .inner
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(&TokenRefreshRequest {
                refresh: refresh_token.as_str(),
            })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token refresh request failed");
                return Ok(false);
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "token refresh rejected");
            return Ok(false);
        }

        match response.json::<TokenRefreshResponse>().await {
            Ok(body) => {
                let access = body.access;
                self.with_store(move |store| store.set_access_token(&access))
                    .await?;
                info!("access token refreshed");
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "malformed token refresh response");
                Ok(false)
            }
        }
    }

    /// Run a credential store operation on the blocking thread pool.
    ///
    /// Store operations may do file I/O and wait on a file lock held by
    /// another process.
    pub(crate) async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn CredentialStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.inner.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StorageError::Interrupted {
                message: e.to_string(),
            })?
    }

    async fn send(
        &self,
        url: &Url,
        options: &RequestOptions,
        headers: HeaderMap,
    ) -> Result<reqwest::Response> {
        let mut builder = self
            .inner
            .client
            .request(options.method().clone(), url.clone())
            .headers(headers);

        if let Some(body) = options.body_str() {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        debug!(status = %response.status(), "response received");
        Ok(response)
    }
}

fn set_bearer(headers: &mut HeaderMap, token: &AccessToken) -> Result<()> {
    let value = HeaderValue::from_str(&token.bearer()).map_err(|e| {
        Error::from(InvalidInputError::Header {
            name: AUTHORIZATION.to_string(),
            reason: e.to_string(),
        })
    })?;
    headers.insert(AUTHORIZATION, value);
    Ok(())
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.inner.base_url)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
