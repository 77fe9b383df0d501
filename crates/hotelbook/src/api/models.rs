//! Booking API resources, filters and forms.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, InvalidInputError};

// ============================================================================
// Users
// ============================================================================

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    pub date_joined: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Full name, falling back to the username when no name is set.
    pub fn display_name(&self) -> &str {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            &self.username
        } else {
            full_name
        }
    }
}

/// Partial profile update. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

// ============================================================================
// Rooms
// ============================================================================

/// A hotel room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: u64,
    pub room_number: String,
    /// Nightly price as the server's decimal string, e.g. `"4500.00"`.
    #[serde(deserialize_with = "decimal_string")]
    pub price_per_night: String,
    pub capacity: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Room list filters. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub capacity: Option<u32>,
    pub is_active: Option<bool>,
    /// `price_per_night`, `capacity` or `room_number`, `-` prefixed for descending.
    pub ordering: Option<String>,
}

impl RoomFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(price) = self.min_price {
            pairs.push(("min_price", price.to_string()));
        }
        if let Some(price) = self.max_price {
            pairs.push(("max_price", price.to_string()));
        }
        if let Some(capacity) = self.capacity {
            pairs.push(("capacity", capacity.to_string()));
        }
        if let Some(active) = self.is_active {
            pairs.push(("is_active", active.to_string()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }
        pairs
    }
}

/// Rooms free for a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub available_rooms_count: u32,
    pub available_rooms: Vec<Room>,
}

// ============================================================================
// Bookings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(BookingStatus::Active),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(InvalidInputError::Other {
                message: format!("unknown booking status '{}'", other),
            }
            .into()),
        }
    }
}

/// Time filter for the booking list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPeriod {
    /// Check-out already passed.
    Past,
    /// Check-in still ahead.
    Upcoming,
    /// Staying today.
    Current,
}

impl BookingPeriod {
    fn query_key(self) -> &'static str {
        match self {
            BookingPeriod::Past => "is_past",
            BookingPeriod::Upcoming => "is_upcoming",
            BookingPeriod::Current => "is_current",
        }
    }
}

/// A booking as returned by the detail, create, update and cancel endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: u64,
    pub room: Room,
    pub user: User,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(deserialize_with = "decimal_string")]
    pub total_price: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub cancelled_by: Option<User>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nights_count: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_past: bool,
    #[serde(default)]
    pub is_upcoming: bool,
    #[serde(default)]
    pub is_current: bool,
}

/// A row of the booking list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummary {
    pub id: u64,
    pub room_number: String,
    #[serde(deserialize_with = "decimal_string")]
    pub room_price: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub nights_count: i64,
    #[serde(deserialize_with = "decimal_string")]
    pub total_price: String,
    pub status: BookingStatus,
    pub created_at: Option<DateTime<Utc>>,
}

/// Booking list filters. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub period: Option<BookingPeriod>,
    pub check_in_after: Option<NaiveDate>,
    pub check_in_before: Option<NaiveDate>,
    pub check_out_after: Option<NaiveDate>,
    pub check_out_before: Option<NaiveDate>,
    /// `created_at`, `check_in`, `check_out` or `total_price`, `-` prefixed for descending.
    pub ordering: Option<String>,
}

impl BookingFilter {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(period) = self.period {
            pairs.push((period.query_key(), "true".to_string()));
        }
        let dates = [
            ("check_in_after", self.check_in_after),
            ("check_in_before", self.check_in_before),
            ("check_out_after", self.check_out_after),
            ("check_out_before", self.check_out_before),
        ];
        for (key, date) in dates {
            if let Some(date) = date {
                pairs.push((key, date.to_string()));
            }
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }
        pairs
    }
}

/// Booking creation form.
#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub room: u64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl NewBooking {
    pub fn new(room: u64, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            room,
            check_in,
            check_out,
        }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn validate(&self) -> Result<(), Error> {
        check_date_order(self.check_in, self.check_out)
    }
}

/// New dates for an existing booking. Unset dates keep their current value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingDates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<NaiveDate>,
}

impl BookingDates {
    pub fn validate(&self) -> Result<(), Error> {
        match (self.check_in, self.check_out) {
            (None, None) => Err(InvalidInputError::Other {
                message: "at least one of check_in and check_out is required".to_string(),
            }
            .into()),
            (Some(check_in), Some(check_out)) => check_date_order(check_in, check_out),
            _ => Ok(()),
        }
    }
}

fn check_date_order(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), Error> {
    if check_out <= check_in {
        return Err(InvalidInputError::Field {
            field: "check_out",
            reason: "must be after check_in".to_string(),
        }
        .into());
    }
    Ok(())
}

// ============================================================================
// Pagination
// ============================================================================

/// One page of a list endpoint.
///
/// List endpoints answer either with a page object
/// (`{count, next, previous, results}`) or with a bare array; both decode
/// into a `Page`.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Listing::deserialize(deserializer)? {
            Listing::Paginated {
                count,
                next,
                previous,
                results,
            } => Page {
                results,
                count,
                next,
                previous,
            },
            Listing::Plain(results) => Page {
                count: Some(results.len() as u64),
                results,
                next: None,
                previous: None,
            },
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn default_true() -> bool {
    true
}

/// Accept decimals serialized either as strings or as JSON numbers.
fn decimal_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Decimal::deserialize(deserializer)? {
        Decimal::Text(text) => text,
        Decimal::Number(number) => number.to_string(),
    })
}
