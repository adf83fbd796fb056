// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutations and the capacity changes they cascade into.
//!
//! Each function runs inside a store transaction, reads the snapshots it
//! needs, asks the transition rules what to do and writes the result.

use tourbook::{
    CancellationPlan, CapacityLimits, ChangeContext, ConversionPlan, PaxChangePlan,
    StatusOutcome, conversion_transition, ensure_active, plan_cancellation, plan_conversion,
    plan_departure_cancellation, plan_discount, plan_pax_change, plan_status_change,
};
use tourbook_domain::{
    Booking, BookingId, BookingStatus, Departure, DepartureId, DepartureType, Money,
    NewDeparture, Tour, validate_pax,
};
use tourbook_persistence::{PersistenceError, StoreTx};
use tracing::debug;

/// Changes the party size of a booking and reprices it.
///
/// An unchanged party size is a no-op.
///
/// # Errors
///
/// Returns an error if the booking is cancelled, the new size is zero or
/// unpriced, or the departure cannot seat the difference.
pub fn update_pax(
    tx: &mut StoreTx<'_>,
    booking_id: BookingId,
    new_pax: u32,
    ctx: &ChangeContext,
) -> Result<Booking, PersistenceError> {
    let booking: Booking = tx.get_booking(booking_id)?;
    ensure_active(&booking)?;
    validate_pax(new_pax)?;

    if new_pax == booking.pax {
        return Ok(booking);
    }

    let tour: Tour = tx.get_tour(booking.tour_id)?;
    let plan: PaxChangePlan = plan_pax_change(&booking, &tour, new_pax, ctx)?;

    let departure: Departure = tx.apply_capacity_delta(booking.departure_id, plan.delta, None)?;
    debug!(
        booking_id = %booking_id,
        departure_id = %departure.departure_id,
        delta = plan.delta,
        current_pax = departure.current_pax,
        "Applied pax change"
    );

    tx.record(&plan.transition)?;
    Ok(plan.transition.booking)
}

/// Sets the discount of a booking.
///
/// # Errors
///
/// Returns an error if the booking does not exist or is cancelled.
pub fn apply_discount(
    tx: &mut StoreTx<'_>,
    booking_id: BookingId,
    discount: Money,
    ctx: &ChangeContext,
) -> Result<Booking, PersistenceError> {
    let booking: Booking = tx.get_booking(booking_id)?;
    let transition = plan_discount(&booking, discount, ctx)?;
    tx.record(&transition)?;
    Ok(transition.booking)
}

/// Cancels a booking, releases its seats and, for a private departure left
/// empty, cancels the departure.
///
/// Returns the cancelled booking and its departure after the release.
///
/// # Errors
///
/// Returns an error if the booking is already cancelled or a write fails.
pub fn cancel(
    tx: &mut StoreTx<'_>,
    booking: &Booking,
    ctx: &ChangeContext,
) -> Result<(Booking, Departure), PersistenceError> {
    let departure: Departure = tx.read_departure(booking.departure_id)?;
    let plan: CancellationPlan = plan_cancellation(booking, &departure, ctx)?;

    let mut after: Departure = tx.apply_capacity_delta(departure.departure_id, plan.release, None)?;
    if plan.cancel_departure {
        after = tx.mark_departure_cancelled(departure.departure_id)?;
        debug!(departure_id = %after.departure_id, "Cancelled emptied private departure");
    }

    tx.record(&plan.transition)?;
    Ok((plan.transition.booking, after))
}

/// Moves a booking between statuses, running the cancellation cascade when
/// the target is `Cancelled`.
///
/// # Errors
///
/// Returns an error if the booking is cancelled or a write fails.
pub fn update_status(
    tx: &mut StoreTx<'_>,
    booking_id: BookingId,
    target: BookingStatus,
    ctx: &ChangeContext,
) -> Result<Booking, PersistenceError> {
    let booking: Booking = tx.get_booking(booking_id)?;

    match plan_status_change(&booking, target, ctx)? {
        StatusOutcome::Unchanged => Ok(booking),
        StatusOutcome::Changed(transition) => {
            tx.record(&transition)?;
            Ok(transition.booking)
        }
        StatusOutcome::Cancel => cancel(tx, &booking, ctx).map(|(cancelled, _)| cancelled),
    }
}

/// Converts a booking between public and private.
///
/// # Errors
///
/// Returns an error if the booking is cancelled, the party exceeds the
/// private ceiling, or a write fails.
pub fn convert(
    tx: &mut StoreTx<'_>,
    limits: CapacityLimits,
    booking_id: BookingId,
    target: DepartureType,
    max_pax: Option<u32>,
    ctx: &ChangeContext,
) -> Result<Booking, PersistenceError> {
    let booking: Booking = tx.get_booking(booking_id)?;
    let departure: Departure = tx.read_departure(booking.departure_id)?;
    let co_occupants: Vec<Booking> = tx.active_bookings(departure.departure_id)?;

    let plan: ConversionPlan = plan_conversion(
        &booking,
        &departure,
        &co_occupants,
        target,
        max_pax,
        limits,
        ctx,
    )?;

    match plan {
        ConversionPlan::Unchanged => Ok(booking),
        ConversionPlan::InPlace {
            departure,
            transition,
        } => {
            tx.set_departure_shape(&departure)?;
            tx.record(&transition)?;
            Ok(transition.booking)
        }
        ConversionPlan::Detach {
            departure_type,
            max_pax,
        } => {
            let detached: Departure = tx.insert_departure(&NewDeparture::new(
                departure.tour_id,
                departure.date,
                departure_type,
                max_pax,
            ))?;
            relocate(tx, &booking, departure.departure_id, detached.departure_id)?;

            debug!(
                booking_id = %booking_id,
                from_departure = %departure.departure_id,
                to_departure = %detached.departure_id,
                "Detached converted booking"
            );

            let transition = conversion_transition(&booking, target, detached.departure_id, ctx);
            tx.record(&transition)?;
            Ok(transition.booking)
        }
    }
}

/// Cancels a departure and every active booking on it.
///
/// # Errors
///
/// Returns an error if the departure is already cancelled or a write fails.
pub fn cancel_departure(
    tx: &mut StoreTx<'_>,
    departure_id: DepartureId,
    ctx: &ChangeContext,
) -> Result<Departure, PersistenceError> {
    let departure: Departure = tx.read_departure(departure_id)?;
    let bookings: Vec<Booking> = tx.active_bookings(departure_id)?;
    let plans: Vec<CancellationPlan> = plan_departure_cancellation(&departure, &bookings, ctx)?;

    for plan in &plans {
        tx.apply_capacity_delta(departure_id, plan.release, None)?;
        tx.record(&plan.transition)?;
    }

    debug!(
        departure_id = %departure_id,
        cancelled_bookings = plans.len(),
        "Released departure"
    );

    tx.mark_departure_cancelled(departure_id)
}

/// Takes a booking's seats off one departure and onto another.
///
/// # Errors
///
/// Returns an error if the destination cannot seat the party or a write
/// fails.
pub fn relocate(
    tx: &mut StoreTx<'_>,
    booking: &Booking,
    from: DepartureId,
    to: DepartureId,
) -> Result<Departure, PersistenceError> {
    let pax: i64 = i64::from(booking.pax);
    tx.apply_capacity_delta(from, -pax, None)?;
    tx.apply_capacity_delta(to, pax, None)
}
