//! Command implementations.

pub mod auth;
pub mod bookings;
pub mod rooms;
