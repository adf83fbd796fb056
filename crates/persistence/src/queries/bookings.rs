// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::dsl::{max, sum};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use tourbook_audit::BookingEvent;
use tourbook_domain::{Booking, BookingId, BookingStatus, DepartureId};

use crate::data_models::{BookingEventRow, BookingRow};
use crate::diesel_schema::{booking_events, bookings};
use crate::error::PersistenceError;

/// Reads a booking.
///
/// # Errors
///
/// Returns `PersistenceError::BookingNotFound` if no such booking exists.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
) -> Result<Booking, PersistenceError> {
    bookings::table
        .filter(bookings::booking_id.eq(booking_id.value()))
        .select(BookingRow::as_select())
        .first::<BookingRow>(conn)
        .optional()?
        .ok_or(PersistenceError::BookingNotFound(booking_id))?
        .into_domain()
}

/// Lists every booking that references a departure, cancelled ones included.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_bookings(
    conn: &mut SqliteConnection,
    departure_id: DepartureId,
) -> Result<Vec<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::departure_id.eq(departure_id.value()))
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load::<BookingRow>(conn)?
        .into_iter()
        .map(BookingRow::into_domain)
        .collect()
}

/// Lists the bookings that hold seats on a departure.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn active_bookings(
    conn: &mut SqliteConnection,
    departure_id: DepartureId,
) -> Result<Vec<Booking>, PersistenceError> {
    bookings::table
        .filter(bookings::departure_id.eq(departure_id.value()))
        .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
        .order(bookings::booking_id.asc())
        .select(BookingRow::as_select())
        .load::<BookingRow>(conn)?
        .into_iter()
        .map(BookingRow::into_domain)
        .collect()
}

/// Sums the party sizes of the active bookings on a departure.
///
/// # Errors
///
/// Returns an error if the query fails or the sum is out of range.
pub fn active_pax_sum(
    conn: &mut SqliteConnection,
    departure_id: DepartureId,
) -> Result<u32, PersistenceError> {
    let total: Option<i64> = bookings::table
        .filter(bookings::departure_id.eq(departure_id.value()))
        .filter(bookings::status.ne(BookingStatus::Cancelled.as_str()))
        .select(sum(bookings::pax))
        .first::<Option<i64>>(conn)?;

    total.unwrap_or(0).to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!(
            "Active pax of departure {departure_id} out of range"
        ))
    })
}

/// Returns the sequence number the next event of a booking gets.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn next_event_sequence(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
) -> Result<i32, PersistenceError> {
    let last: Option<i32> = booking_events::table
        .filter(booking_events::booking_id.eq(booking_id.value()))
        .select(max(booking_events::sequence))
        .first::<Option<i32>>(conn)?;

    Ok(last.map_or(1, |seq| seq.saturating_add(1)))
}

/// Loads the audit history of a booking, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored event cannot be decoded.
pub fn booking_history(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
) -> Result<Vec<BookingEvent>, PersistenceError> {
    booking_events::table
        .filter(booking_events::booking_id.eq(booking_id.value()))
        .order(booking_events::sequence.asc())
        .select(BookingEventRow::as_select())
        .load::<BookingEventRow>(conn)?
        .into_iter()
        .map(|row| Ok(serde_json::from_str::<BookingEvent>(&row.event_json)?))
        .collect()
}
