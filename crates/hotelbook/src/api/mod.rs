//! Typed Booking API client.
//!
//! This module provides [`BookingClient`] and the resources it exchanges with
//! the server: users, rooms and bookings.

mod client;
pub mod endpoints;
mod models;

pub use client::BookingClient;
pub use endpoints::CancelledBooking;
pub use models::{
    Availability, Booking, BookingDates, BookingFilter, BookingPeriod, BookingStatus,
    BookingSummary, NewBooking, Page, ProfileUpdate, Room, RoomFilter, User,
};
