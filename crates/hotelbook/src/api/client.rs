//! Typed client for the Booking API.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, trace, warn};

use crate::Result;
use crate::auth::{CredentialStore, Credentials, PasswordChange, Registration, TokenPair};
use crate::config::ClientConfig;
use crate::error::{ApiError, AuthError, Error};
use crate::gateway::{Gateway, Outcome, RequestOptions};

use super::endpoints::{self, *};
use super::models::{
    Availability, Booking, BookingDates, BookingFilter, BookingSummary, NewBooking, Page,
    ProfileUpdate, Room, RoomFilter, User,
};

/// Booking API client.
///
/// Account and booking calls go through the [`Gateway`], so they carry the
/// stored access token and survive its expiry. Room reads are public and
/// are sent without credentials. Non-success answers become
/// [`Error::Api`]; an expired session that could not be renewed becomes
/// [`AuthError::SessionExpired`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use hotelbook::{ApiUrl, BookingClient, ClientConfig, Credentials, FileStore, RoomFilter};
///
/// # async fn example() -> Result<(), hotelbook::Error> {
/// let config = ClientConfig::new(ApiUrl::new("http://localhost:8000")?);
/// let client = BookingClient::connect(config, Arc::new(FileStore::new("credentials.json")))?;
///
/// client.login(&Credentials::new("alice", "s3cret-pass")).await?;
/// for room in client.list_rooms(&RoomFilter::default()).await?.results {
///     println!("{} sleeps {}", room.room_number, room.capacity);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BookingClient {
    gateway: Gateway,
}

impl BookingClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Create a client with its own gateway.
    pub fn connect(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        Ok(Self::new(Gateway::new(config, store)?))
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        self.gateway.is_authenticated()
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Create an account and store the issued tokens.
    #[instrument(skip(self, form), fields(username = %form.username))]
    pub async fn register(&self, form: &Registration) -> Result<User> {
        form.validate()?;
        info!("Registering account");

        let request = RegisterRequest {
            username: &form.username,
            email: &form.email,
            password: &form.password,
            password_confirm: &form.password_confirm,
            first_name: &form.first_name,
            last_name: &form.last_name,
            phone: &form.phone,
        };

        let response: RegisterResponse = self
            .call(REGISTER, RequestOptions::post().json(&request)?)
            .await?;

        let RegisterResponse { user, tokens } = response;
        self.gateway
            .with_store(move |store| store.set_tokens(&tokens))
            .await?;
        debug!(user_id = user.id, "Account registered");
        Ok(user)
    }

    /// Log in and store the issued tokens.
    ///
    /// # Errors
    ///
    /// A rejected username or password is reported as
    /// [`AuthError::InvalidCredentials`].
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        credentials.validate()?;
        info!("Logging in");

        let request = LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let tokens: TokenPair = match self
            .call(LOGIN, RequestOptions::post().json(&request)?)
            .await
        {
            Ok(tokens) => tokens,
            Err(Error::Api(api)) if api.status == 401 => {
                let reason = api
                    .detail
                    .unwrap_or_else(|| "invalid username or password".to_string());
                return Err(AuthError::InvalidCredentials(reason).into());
            }
            Err(Error::Auth(AuthError::SessionExpired)) => {
                return Err(
                    AuthError::InvalidCredentials("invalid username or password".to_string())
                        .into(),
                );
            }
            Err(e) => return Err(e),
        };

        self.gateway
            .with_store(move |store| store.set_tokens(&tokens))
            .await?;
        debug!("Logged in");
        Ok(())
    }

    /// Invalidate the refresh token on the server and forget both tokens.
    ///
    /// The local tokens are cleared whatever the server answers; server or
    /// network failures are only logged.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let stored = self
            .gateway
            .with_store(|store| store.refresh_token())
            .await?;

        if let Some(refresh_token) = stored {
            let request = LogoutRequest {
                refresh: refresh_token.as_str(),
            };
            let options = RequestOptions::post().json(&request)?;

            match self.gateway.request(LOGOUT, options).await {
                Ok(Outcome::Response(response)) if response.status().is_success() => {
                    debug!("Refresh token revoked");
                }
                Ok(Outcome::Response(response)) => {
                    warn!(status = %response.status(), "Logout rejected by server");
                }
                Ok(Outcome::Unauthenticated) => {
                    debug!("Session already expired");
                }
                Err(e) => {
                    warn!(error = %e, "Logout request failed");
                }
            }
        }

        self.gateway.with_store(|store| store.clear()).await?;
        info!("Logged out");
        Ok(())
    }

    /// Fetch the current user's profile.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User> {
        self.call(PROFILE, RequestOptions::get()).await
    }

    /// Update the current user's profile.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<ProfileUpdate> {
        self.call(PROFILE, RequestOptions::patch().json(update)?)
            .await
    }

    /// Change the current user's password. Returns the server's message.
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: &PasswordChange) -> Result<String> {
        change.validate()?;

        let request = ChangePasswordRequest {
            old_password: &change.old_password,
            new_password: &change.new_password,
            new_password_confirm: &change.new_password_confirm,
        };

        let response: MessageResponse = self
            .call(CHANGE_PASSWORD, RequestOptions::post().json(&request)?)
            .await?;
        Ok(response.message)
    }

    // ========================================================================
    // Rooms
    // ========================================================================

    /// List rooms matching the filter.
    #[instrument(skip(self))]
    pub async fn list_rooms(&self, filter: &RoomFilter) -> Result<Page<Room>> {
        let url = self.url_with_query(ROOMS, &filter.query_pairs())?;
        self.call_public(&url, RequestOptions::get()).await
    }

    /// Fetch a single room.
    #[instrument(skip(self))]
    pub async fn room(&self, id: u64) -> Result<Room> {
        self.call_public(&endpoints::room(id), RequestOptions::get())
            .await
    }

    /// List rooms free between the two dates.
    #[instrument(skip(self))]
    pub async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Availability> {
        let url = self.url_with_query(
            ROOMS_AVAILABLE,
            &[
                ("check_in", check_in.to_string()),
                ("check_out", check_out.to_string()),
            ],
        )?;
        self.call_public(&url, RequestOptions::get()).await
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// List the current user's bookings.
    #[instrument(skip(self))]
    pub async fn list_bookings(&self, filter: &BookingFilter) -> Result<Page<BookingSummary>> {
        let url = self.url_with_query(BOOKINGS, &filter.query_pairs())?;
        self.call(&url, RequestOptions::get()).await
    }

    /// Fetch a single booking.
    #[instrument(skip(self))]
    pub async fn booking(&self, id: u64) -> Result<Booking> {
        self.call(&endpoints::booking(id), RequestOptions::get())
            .await
    }

    /// Book a room.
    #[instrument(skip(self))]
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking> {
        booking.validate()?;
        info!(room = booking.room, "Creating booking");
        self.call(BOOKING_CREATE, RequestOptions::post().json(booking)?)
            .await
    }

    /// Move the dates of a booking.
    #[instrument(skip(self))]
    pub async fn update_booking(&self, id: u64, dates: &BookingDates) -> Result<Booking> {
        dates.validate()?;
        self.call(
            &endpoints::booking_update(id),
            RequestOptions::patch().json(dates)?,
        )
        .await
    }

    /// Cancel a booking.
    #[instrument(skip(self))]
    pub async fn cancel_booking(&self, id: u64) -> Result<CancelledBooking> {
        info!("Cancelling booking");
        self.call(&endpoints::booking_cancel(id), RequestOptions::delete())
            .await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn url_with_query(&self, path: &str, pairs: &[(&str, String)]) -> Result<String> {
        let mut url = self.gateway.base_url().resolve(path)?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url.into())
    }

    /// Send a request through the gateway and decode a JSON answer.
    async fn call<R: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<R> {
        match self.gateway.request(url, options).await? {
            Outcome::Response(response) => decode(response).await,
            Outcome::Unauthenticated => Err(AuthError::SessionExpired.into()),
        }
    }

    /// Like [`call`](Self::call) for public endpoints: no token is sent, so a
    /// stale session cannot break them.
    async fn call_public<R: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<R> {
        decode(self.gateway.request_anonymous(url, options).await?).await
    }
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let status = response.status();
    trace!(%status, "API response");

    if status.is_success() {
        Ok(response.json::<R>().await?)
    } else {
        Err(Error::Api(parse_error_response(response).await))
    }
}

/// Parse a non-success answer. Bodies that are not JSON keep only the status.
async fn parse_error_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();

    match response.json::<serde_json::Value>().await {
        Ok(body) => ApiError::from_body(status, &body),
        Err(_) => ApiError::new(status),
    }
}
