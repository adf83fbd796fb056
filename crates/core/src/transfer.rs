// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rules for moving bookings between departures.

use crate::cascade::{ensure_active, ensure_on_departure};
use crate::error::CoreError;
use crate::state::{BookingTransition, ChangeContext};
use tourbook_audit::{BookingChange, BookingEvent};
use tourbook_domain::{
    Booking, Departure, DepartureDate, DepartureId, DepartureType, TourId,
};

/// Where a moved booking should end up.
///
/// Every field falls back to the booking's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTarget {
    /// Destination tour.
    pub tour_id: TourId,
    /// Destination date.
    pub date: DepartureDate,
    /// Destination visibility mode.
    pub departure_type: DepartureType,
}

impl MoveTarget {
    /// Resolves a move request against the booking being moved.
    ///
    /// # Arguments
    ///
    /// * `booking` - The booking being moved
    /// * `source` - The departure it currently holds seats on
    /// * `tour_id` - Requested tour, if any
    /// * `date` - Requested date, if any
    /// * `departure_type` - Requested type, if any
    #[must_use]
    pub fn resolve(
        booking: &Booking,
        source: &Departure,
        tour_id: Option<TourId>,
        date: Option<DepartureDate>,
        departure_type: Option<DepartureType>,
    ) -> Self {
        Self {
            tour_id: tour_id.unwrap_or(booking.tour_id),
            date: date.unwrap_or(source.date),
            departure_type: departure_type.unwrap_or(booking.booking_type),
        }
    }
}

/// The audit changes describing a move from `source` to `destination`.
///
/// A move that keeps tour, date and type is recorded as a date change onto
/// the same date so the relink is never silent.
#[must_use]
pub fn move_changes(
    booking: &Booking,
    source: &Departure,
    destination: &Departure,
) -> Vec<BookingChange> {
    let mut changes: Vec<BookingChange> = Vec::new();

    if source.tour_id != destination.tour_id {
        changes.push(BookingChange::TourChange {
            from_tour: source.tour_id,
            to_tour: destination.tour_id,
            from_departure: source.departure_id,
            to_departure: destination.departure_id,
        });
    }

    if source.date != destination.date || changes.is_empty() {
        changes.push(BookingChange::DateChange {
            from_departure: source.departure_id,
            to_departure: destination.departure_id,
            from_date: source.date,
            to_date: destination.date,
        });
    }

    if booking.booking_type != destination.departure_type {
        changes.push(BookingChange::Conversion {
            before_type: booking.booking_type,
            after_type: destination.departure_type,
            from_departure: source.departure_id,
            to_departure: destination.departure_id,
        });
    }

    changes
}

/// The two bookings of a completed move after they are linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLink {
    /// The cancelled source booking, now pointing at its replacement.
    pub source: Booking,
    /// The replacement booking, now pointing back at the source.
    pub destination: Booking,
    /// Events appended to both bookings.
    pub events: Vec<BookingEvent>,
}

/// Links a cancelled booking to the booking that replaced it.
#[must_use]
pub fn link_move(
    source_booking: &Booking,
    destination_booking: &Booking,
    changes: Vec<BookingChange>,
    ctx: &ChangeContext,
) -> MoveLink {
    let mut source: Booking = source_booking.clone();
    source.moved_to = Some(destination_booking.booking_id);
    source.updated_at = ctx.at;

    let mut destination: Booking = destination_booking.clone();
    destination.moved_from = Some(source_booking.booking_id);
    destination.updated_at = ctx.at;

    let events: Vec<BookingEvent> = changes.into_iter().map(|c| ctx.event(c)).collect();

    MoveLink {
        source,
        destination,
        events,
    }
}

/// Validates a split selection and returns the seats it moves.
///
/// # Arguments
///
/// * `source` - The departure being split
/// * `selected` - The bookings to move
/// * `target_type` - Type of the departure they move to
///
/// # Errors
///
/// Returns an error if:
/// - The selection is empty
/// - A selected booking is cancelled or not on `source`
/// - The target is private and the selection spans more than one party
pub fn validate_split(
    source: &Departure,
    selected: &[Booking],
    target_type: DepartureType,
) -> Result<u32, CoreError> {
    let Some(first) = selected.first() else {
        return Err(CoreError::EmptySelection {
            departure_id: source.departure_id,
        });
    };

    let mut total: u32 = 0;
    for booking in selected {
        ensure_active(booking)?;
        ensure_on_departure(booking, source.departure_id)?;
        total = total.saturating_add(booking.pax);
    }

    if target_type == DepartureType::Private && !selected.iter().all(|b| b.same_party(first)) {
        return Err(CoreError::MixedParty {
            departure_id: source.departure_id,
        });
    }

    Ok(total)
}

/// Rewrites a booking's departure for a split.
#[must_use]
pub fn split_transition(
    booking: &Booking,
    target_type: DepartureType,
    to_departure: DepartureId,
    ctx: &ChangeContext,
) -> BookingTransition {
    let mut updated: Booking = booking.clone();
    updated.departure_id = to_departure;
    updated.booking_type = target_type;
    updated.updated_at = ctx.at;

    let event = ctx.event(BookingChange::Split {
        from_departure: booking.departure_id,
        to_departure,
    });

    BookingTransition {
        booking: updated,
        event,
    }
}
