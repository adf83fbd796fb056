// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};
use tourbook_audit::BookingEvent;
use tourbook_domain::{Booking, BookingId, NewBooking, validate_customer, validate_pax};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{
    NewBookingEventRow, NewBookingRow, format_timestamp, money_to_db, pax_to_db,
};
use crate::diesel_schema::{booking_events, bookings};
use crate::error::PersistenceError;
use crate::queries::bookings::{get_booking, next_event_sequence};

/// Inserts a booking.
///
/// A booking that does not continue a move chain becomes the root of its
/// own lineage.
///
/// # Errors
///
/// Returns an error if the values are invalid or the insert fails.
pub fn insert_booking(
    conn: &mut SqliteConnection,
    booking: &NewBooking,
    at: OffsetDateTime,
) -> Result<Booking, PersistenceError> {
    validate_pax(booking.pax)?;
    validate_customer(&booking.customer)?;

    let now: String = format_timestamp(at)?;
    let row = NewBookingRow {
        departure_id: booking.departure_id.value(),
        tour_id: booking.tour_id.value(),
        lineage_id: booking.lineage_id.map(|id| id.value()),
        pax: pax_to_db(booking.pax, "bookings.pax")?,
        customer_name: booking.customer.name.clone(),
        customer_email: booking.customer.email.clone(),
        customer_phone: booking.customer.phone.clone(),
        status: booking.status.as_str().to_string(),
        booking_type: booking.booking_type.as_str().to_string(),
        original_price: money_to_db(booking.original_price, "bookings.original_price")?,
        discount: money_to_db(booking.discount, "bookings.discount")?,
        final_price: money_to_db(booking.final_price(), "bookings.final_price")?,
        moved_from: booking.moved_from.map(|id| id.value()),
        created_at: now.clone(),
        updated_at: now,
    };

    diesel::insert_into(bookings::table)
        .values(&row)
        .execute(conn)?;

    let booking_id: i64 = get_last_insert_rowid(conn)?;

    if booking.lineage_id.is_none() {
        diesel::update(bookings::table.filter(bookings::booking_id.eq(booking_id)))
            .set(bookings::lineage_id.eq(booking_id))
            .execute(conn)?;
    }

    info!(
        booking_id,
        departure_id = booking.departure_id.value(),
        pax = booking.pax,
        booking_type = booking.booking_type.as_str(),
        "Created booking"
    );

    get_booking(conn, BookingId::new(booking_id))
}

/// Writes every mutable field of a booking.
///
/// # Errors
///
/// Returns `PersistenceError::BookingNotFound` if the booking does not exist,
/// or another error if the write fails.
pub fn update_booking(conn: &mut SqliteConnection, booking: &Booking) -> Result<(), PersistenceError> {
    let rows: usize = diesel::update(
        bookings::table.filter(bookings::booking_id.eq(booking.booking_id.value())),
    )
    .set((
        bookings::departure_id.eq(booking.departure_id.value()),
        bookings::tour_id.eq(booking.tour_id.value()),
        bookings::pax.eq(pax_to_db(booking.pax, "bookings.pax")?),
        bookings::status.eq(booking.status.as_str()),
        bookings::booking_type.eq(booking.booking_type.as_str()),
        bookings::original_price.eq(money_to_db(booking.original_price, "bookings.original_price")?),
        bookings::discount.eq(money_to_db(booking.discount, "bookings.discount")?),
        bookings::final_price.eq(money_to_db(booking.final_price, "bookings.final_price")?),
        bookings::moved_from.eq(booking.moved_from.map(|id| id.value())),
        bookings::moved_to.eq(booking.moved_to.map(|id| id.value())),
        bookings::updated_at.eq(format_timestamp(booking.updated_at)?),
    ))
    .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::BookingNotFound(booking.booking_id));
    }

    debug!(
        booking_id = booking.booking_id.value(),
        departure_id = booking.departure_id.value(),
        status = booking.status.as_str(),
        pax = booking.pax,
        "Updated booking"
    );

    Ok(())
}

/// Appends an event to a booking's audit history.
///
/// # Errors
///
/// Returns an error if the event cannot be serialized or the insert fails.
pub fn append_booking_event(
    conn: &mut SqliteConnection,
    booking_id: BookingId,
    event: &BookingEvent,
) -> Result<(), PersistenceError> {
    let sequence: i32 = next_event_sequence(conn, booking_id)?;
    let row = NewBookingEventRow {
        booking_id: booking_id.value(),
        sequence,
        kind: event.kind().to_string(),
        recorded_at: format_timestamp(event.at)?,
        event_json: serde_json::to_string(event)?,
    };

    diesel::insert_into(booking_events::table)
        .values(&row)
        .execute(conn)?;

    debug!(
        booking_id = booking_id.value(),
        sequence,
        kind = event.kind(),
        "Appended booking event"
    );

    Ok(())
}
