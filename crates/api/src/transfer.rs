// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Moving bookings between departures.

use tourbook::{
    CapacityLimits, ChangeContext, CoreError, MoveLink, MoveTarget, ensure_active, link_move,
    move_changes, quote_bookable, split_transition, validate_split,
};
use tourbook_domain::{
    Booking, BookingId, Departure, DepartureId, DepartureType, NewDeparture, Tour,
};
use tourbook_persistence::{PersistenceError, StoreTx};
use tracing::debug;

use crate::allocator::{self, Inheritance};
use crate::cascade;
use crate::request_response::{
    JoinRequest, MoveDestination, MoveResponse, SplitResponse, SplitTarget,
};

/// Outcome of the first phase of a move.
#[derive(Debug, Clone)]
pub struct Released {
    /// The source booking as it was before cancellation.
    pub original: Booking,
    /// The source booking after cancellation.
    pub cancelled: Booking,
    /// The source departure after the release.
    pub source: Departure,
    /// Where the party goes.
    pub target: MoveTarget,
}

/// First phase of a move: checks the destination can take the party, then
/// cancels the source booking.
///
/// Nothing is written when the destination check fails.
///
/// # Errors
///
/// Returns an error if the booking is cancelled, the destination tour is
/// missing, inactive or does not price the party, no destination departure
/// could hold it, or a write fails.
pub fn release(
    tx: &mut StoreTx<'_>,
    limits: CapacityLimits,
    booking_id: BookingId,
    destination: &MoveDestination,
    ctx: &ChangeContext,
) -> Result<Released, PersistenceError> {
    let original: Booking = tx.get_booking(booking_id)?;
    ensure_active(&original)?;

    let source: Departure = tx.read_departure(original.departure_id)?;
    let target: MoveTarget = MoveTarget::resolve(
        &original,
        &source,
        destination.tour_id,
        destination.date,
        destination.departure_type,
    );

    let tour: Tour = tx.get_tour(target.tour_id)?;
    quote_bookable(&tour, original.pax)?;

    ensure_seatable(tx, limits, &original, &source, &target)?;

    let (cancelled, source) = cascade::cancel(tx, &original, ctx)?;

    Ok(Released {
        original,
        cancelled,
        source,
        target,
    })
}

/// Checks that the destination will have room for the party once the
/// source booking is released.
///
/// A private destination is always a new departure at the private ceiling.
/// A public party larger than the default capacity needs an existing
/// departure to join, which may be the source itself once released.
fn ensure_seatable(
    tx: &mut StoreTx<'_>,
    limits: CapacityLimits,
    original: &Booking,
    source: &Departure,
    target: &MoveTarget,
) -> Result<(), PersistenceError> {
    let pax: u32 = original.pax;
    let max_pax: u32 = match target.departure_type {
        DepartureType::Private => limits.private_max_pax,
        DepartureType::Public => limits.default_public_max_pax,
    };
    if pax <= max_pax {
        return Ok(());
    }

    if target.departure_type == DepartureType::Public {
        let rejoins_source: bool = source.departure_type == DepartureType::Public
            && source.tour_id == target.tour_id
            && source.date == target.date
            && !source.is_cancelled();
        if rejoins_source
            || tx
                .find_joinable_departure(target.tour_id, target.date, pax)?
                .is_some()
        {
            return Ok(());
        }
    }

    debug!(
        booking_id = %original.booking_id,
        pax,
        max_pax,
        "Move destination cannot seat party"
    );
    Err(CoreError::CapacityExceeded {
        departure_id: source.departure_id,
        requested: pax,
        current_pax: 0,
        max_pax,
    }
    .into())
}

/// Second phase of a move: seats the party at the destination and links
/// the two bookings.
///
/// # Errors
///
/// Returns an error if the party cannot be seated or a write fails.
pub fn place(
    tx: &mut StoreTx<'_>,
    limits: CapacityLimits,
    released: &Released,
    ctx: &ChangeContext,
) -> Result<MoveResponse, PersistenceError> {
    let original: &Booking = &released.original;

    let request: JoinRequest = JoinRequest::new(
        released.target.tour_id,
        released.target.date,
        released.target.departure_type,
        original.pax,
        original.customer.clone(),
    );
    let inheritance: Inheritance = Inheritance {
        discount: original.discount,
        lineage_id: Some(original.lineage_id),
        moved_from: Some(original.booking_id),
    };

    let joined = allocator::join(tx, limits, &request, inheritance, ctx)?;

    let changes = move_changes(original, &released.source, &joined.departure);
    let link: MoveLink = link_move(&released.cancelled, &joined.booking, changes, ctx);

    tx.update_booking(&link.source)?;
    tx.update_booking(&link.destination)?;
    for event in &link.events {
        tx.append_event(link.source.booking_id, event)?;
        tx.append_event(link.destination.booking_id, event)?;
    }

    Ok(MoveResponse {
        source: link.source,
        booking: link.destination,
        departure: joined.departure,
    })
}

/// Moves the selected bookings of a departure onto a new departure.
///
/// # Errors
///
/// Returns an error if the selection is empty, contains a cancelled booking
/// or one from another departure, mixes parties for a private target, or
/// the new departure cannot hold the selection.
pub fn split(
    tx: &mut StoreTx<'_>,
    limits: CapacityLimits,
    departure_id: DepartureId,
    booking_ids: &[BookingId],
    target: SplitTarget,
    ctx: &ChangeContext,
) -> Result<SplitResponse, PersistenceError> {
    let source: Departure = tx.read_departure(departure_id)?;

    let mut selected: Vec<Booking> = Vec::with_capacity(booking_ids.len());
    for booking_id in booking_ids {
        if selected.iter().any(|b| b.booking_id == *booking_id) {
            continue;
        }
        selected.push(tx.get_booking(*booking_id)?);
    }

    let total_pax: u32 = validate_split(&source, &selected, target.departure_type)?;

    let created: Departure = tx.insert_departure(&NewDeparture::new(
        source.tour_id,
        source.date,
        target.departure_type,
        limits.capacity_for(target.departure_type, target.max_pax),
    ))?;

    let mut moved: Vec<Booking> = Vec::with_capacity(selected.len());
    for booking in &selected {
        cascade::relocate(tx, booking, departure_id, created.departure_id)?;
        let transition = split_transition(booking, target.departure_type, created.departure_id, ctx);
        tx.record(&transition)?;
        moved.push(transition.booking);
    }

    let mut source_after: Departure = tx.read_departure(departure_id)?;
    if source_after.departure_type == DepartureType::Private && source_after.current_pax == 0 {
        source_after = tx.mark_departure_cancelled(departure_id)?;
    }

    debug!(
        from_departure = %departure_id,
        to_departure = %created.departure_id,
        bookings = moved.len(),
        pax = total_pax,
        "Split departure"
    );

    Ok(SplitResponse {
        source: source_after,
        target: tx.read_departure(created.departure_id)?,
        bookings: moved,
    })
}
