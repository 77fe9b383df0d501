//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use hotelbook::{Booking, BookingStatus, BookingSummary, Room, User};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a note on stderr.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn user(user: &User) {
    field("Username", &user.username);
    field("Name", user.display_name());
    if !user.email.is_empty() {
        field("Email", &user.email);
    }
    if !user.phone.is_empty() {
        field("Phone", &user.phone);
    }
    if let Some(joined) = user.date_joined {
        field("Joined", &joined.format("%Y-%m-%d").to_string());
    }
}

/// One line per room, for lists.
pub fn room_row(room: &Room) {
    let inactive = if room.is_active { "" } else { " (inactive)" };
    println!(
        "{:>5}  {:<8} {:>10}/night  sleeps {}{}",
        format!("#{}", room.id).dimmed(),
        room.room_number,
        room.price_per_night,
        room.capacity,
        inactive.yellow()
    );
}

pub fn room(room: &Room) {
    field("Room", &room.room_number);
    field("ID", &room.id.to_string());
    field("Price per night", &room.price_per_night);
    field("Capacity", &room.capacity.to_string());
    field("Active", if room.is_active { "yes" } else { "no" });
    if !room.description.is_empty() {
        field("Description", &room.description);
    }
}

/// One line per booking, for lists.
pub fn booking_row(booking: &BookingSummary) {
    println!(
        "{:>5}  room {:<8} {} → {}  {:>2} nights  {:>10}  {}",
        format!("#{}", booking.id).dimmed(),
        booking.room_number,
        booking.check_in,
        booking.check_out,
        booking.nights_count,
        booking.total_price,
        status(booking.status)
    );
}

pub fn booking(booking: &Booking) {
    field("Booking", &format!("#{}", booking.id));
    field("Room", &booking.room.room_number);
    field("Check-in", &booking.check_in.to_string());
    field("Check-out", &booking.check_out.to_string());
    field("Nights", &booking.nights_count.to_string());
    field("Total", &booking.total_price);
    field("Status", &status(booking.status));
    if let Some(cancelled_at) = booking.cancelled_at {
        field("Cancelled", &cancelled_at.format("%Y-%m-%d %H:%M").to_string());
    }
}

fn status(status: BookingStatus) -> String {
    match status {
        BookingStatus::Active => status.as_str().green().to_string(),
        BookingStatus::Cancelled => status.as_str().red().to_string(),
    }
}
