//! Booking API endpoint paths and wire-only request/response bodies.

use serde::{Deserialize, Serialize};

use crate::auth::TokenPair;

use super::models::{Booking, User};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Common prefix of every API path.
pub const API_PREFIX: &str = "/api/v1";

pub const REGISTER: &str = "/api/v1/auth/register/";

pub const LOGIN: &str = "/api/v1/auth/login/";

pub const LOGOUT: &str = "/api/v1/auth/logout/";

/// Exchanges a refresh token for a new access token.
pub const TOKEN_REFRESH: &str = "/api/v1/auth/token/refresh/";

/// The current user's profile (GET, PATCH).
pub const PROFILE: &str = "/api/v1/auth/me/";

pub const CHANGE_PASSWORD: &str = "/api/v1/auth/change-password/";

pub const ROOMS: &str = "/api/v1/rooms/";

pub const ROOMS_AVAILABLE: &str = "/api/v1/rooms/available/";

pub const BOOKINGS: &str = "/api/v1/bookings/";

pub const BOOKING_CREATE: &str = "/api/v1/bookings/create/";

pub fn room(id: u64) -> String {
    format!("{}/rooms/{}/", API_PREFIX, id)
}

pub fn booking(id: u64) -> String {
    format!("{}/bookings/{}/", API_PREFIX, id)
}

pub fn booking_update(id: u64) -> String {
    format!("{}/bookings/{}/update/", API_PREFIX, id)
}

pub fn booking_cancel(id: u64) -> String {
    format!("{}/bookings/{}/cancel/", API_PREFIX, id)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for login.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Request body for registration.
#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
}

/// Response from registration.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterResponse {
    pub user: User,
    pub tokens: TokenPair,
}

/// Request body for logout.
#[derive(Serialize)]
pub(crate) struct LogoutRequest<'a> {
    pub refresh: &'a str,
}

/// Request body for a password change.
#[derive(Serialize)]
pub(crate) struct ChangePasswordRequest<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
    pub new_password_confirm: &'a str,
}

/// `{"message": ...}` acknowledgement.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Response from booking cancellation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelledBooking {
    #[serde(default)]
    pub message: String,
    pub booking: Booking,
}
