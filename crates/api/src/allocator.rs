// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Create-or-join seating of new parties.
//!
//! Everything here runs inside one store transaction: the search for a
//! joinable departure, the creation of a new one, the capacity write, the
//! booking insert and its `Created` event either all commit or none do.

use tourbook::{CapacityLimits, ChangeContext, CoreError, quote_bookable};
use tourbook_audit::BookingChange;
use tourbook_domain::{
    Booking, BookingId, BookingStatus, Departure, DepartureStatus, DepartureType, Money,
    NewBooking, NewDeparture, Tour, validate_customer,
};
use tourbook_persistence::{PersistenceError, StoreTx};
use tracing::debug;

use crate::request_response::{JoinRequest, JoinResponse};

/// Values a booking inherits when it replaces an earlier one.
#[derive(Debug, Clone, Copy)]
pub struct Inheritance {
    pub discount: Money,
    pub lineage_id: Option<BookingId>,
    pub moved_from: Option<BookingId>,
}

impl Inheritance {
    /// A booking that replaces nothing.
    pub const FRESH: Self = Self {
        discount: Money::ZERO,
        lineage_id: None,
        moved_from: None,
    };
}

/// Prices the party, seats it and inserts its booking.
///
/// # Errors
///
/// Returns `PersistenceError::Rule` if the tour is inactive, no tier covers
/// the party, the customer is incomplete or the chosen departure cannot
/// seat it; `PersistenceError::TourNotFound` if the tour does not exist;
/// and `PersistenceError::Conflict` if a departure changed concurrently.
pub fn join(
    tx: &mut StoreTx<'_>,
    limits: CapacityLimits,
    request: &JoinRequest,
    inheritance: Inheritance,
    ctx: &ChangeContext,
) -> Result<JoinResponse, PersistenceError> {
    let tour: Tour = tx.get_tour(request.tour_id)?;
    let original_price: Money = quote_bookable(&tour, request.pax)?;
    validate_customer(&request.customer)?;

    let departure: Departure = seat(tx, limits, request)?;

    let booking: NewBooking = NewBooking {
        departure_id: departure.departure_id,
        tour_id: tour.tour_id,
        lineage_id: inheritance.lineage_id,
        pax: request.pax,
        customer: request.customer.clone(),
        status: BookingStatus::Pending,
        booking_type: request.departure_type,
        original_price,
        discount: inheritance.discount,
        moved_from: inheritance.moved_from,
    };

    let created = ctx.event(BookingChange::Created {
        departure_id: departure.departure_id,
        pax: request.pax,
        booking_type: request.departure_type,
    });

    let booking: Booking = tx.insert_booking(&booking, &created)?;

    Ok(JoinResponse { departure, booking })
}

/// Finds or creates the departure for the party and takes its seats.
fn seat(
    tx: &mut StoreTx<'_>,
    limits: CapacityLimits,
    request: &JoinRequest,
) -> Result<Departure, PersistenceError> {
    let own_departure: bool =
        request.departure_type == DepartureType::Private || request.force_new_departure;

    if !own_departure
        && let Some(existing) = tx.find_joinable_departure(request.tour_id, request.date, request.pax)?
    {
        debug!(
            departure_id = %existing.departure_id,
            pax = request.pax,
            available = existing.available(),
            "Joining existing departure"
        );
        return tx.apply_capacity_delta(
            existing.departure_id,
            i64::from(request.pax),
            Some(DepartureStatus::Open),
        );
    }

    let created: Departure = tx.insert_departure(&NewDeparture::new(
        request.tour_id,
        request.date,
        request.departure_type,
        limits.capacity_for(request.departure_type, request.max_pax),
    ))?;

    debug!(
        departure_id = %created.departure_id,
        departure_type = %created.departure_type,
        max_pax = created.max_pax,
        "Created departure"
    );

    tx.apply_capacity_delta(created.departure_id, i64::from(request.pax), None)
}

/// Inserts an empty departure for an active tour.
///
/// # Errors
///
/// Returns an error if the tour does not exist or is inactive, or the
/// capacity is zero.
pub fn create_empty(
    tx: &mut StoreTx<'_>,
    new_departure: &NewDeparture,
) -> Result<Departure, PersistenceError> {
    let tour: Tour = tx.get_tour(new_departure.tour_id)?;
    if !tour.is_active {
        return Err(CoreError::TourNotBookable(tour.tour_id).into());
    }
    tx.insert_departure(new_departure)
}
