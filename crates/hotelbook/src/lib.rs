//! hotelbook - client library for the hotel booking REST API
//!
//! Requests that need a logged-in user go through a [`Gateway`], which
//! attaches the stored JWT access token, refreshes it when the server answers
//! `401 Unauthorized` and retries the request once. Tokens live in a
//! [`CredentialStore`] handed to the gateway at construction.
//!
//! [`BookingClient`] wraps the gateway with typed calls for accounts, rooms
//! and bookings.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hotelbook::{ApiUrl, BookingClient, BookingFilter, ClientConfig, Credentials, MemoryStore};
//!
//! # async fn example() -> Result<(), hotelbook::Error> {
//! let config = ClientConfig::new(ApiUrl::new("http://localhost:8000")?);
//! let client = BookingClient::connect(config, Arc::new(MemoryStore::new()))?;
//!
//! client.login(&Credentials::new("alice", "s3cret-pass")).await?;
//!
//! for booking in client.list_bookings(&BookingFilter::default()).await?.results {
//!     println!("#{} room {} {}..{}", booking.id, booking.room_number, booking.check_in, booking.check_out);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

// Re-export primary types at crate root for convenience
pub use api::{
    Availability, Booking, BookingClient, BookingDates, BookingFilter, BookingPeriod,
    BookingStatus, BookingSummary, CancelledBooking, NewBooking, Page, ProfileUpdate, Room,
    RoomFilter, User,
};
pub use auth::{
    AccessToken, CredentialStore, Credentials, FileStore, MemoryStore, PasswordChange,
    RefreshToken, Registration, TokenPair, TokenSlot,
};
pub use config::ClientConfig;
pub use error::Error;
pub use gateway::{Gateway, Outcome, RequestOptions};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
