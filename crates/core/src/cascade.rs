// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking edits and the effect each one has on its departure.
//!
//! Every function here is pure: it receives the snapshots the caller read
//! inside its transaction and returns the snapshots to write together with
//! the audit event to append. Capacity writes go through
//! [`crate::apply_capacity_delta`] in the caller.

use crate::capacity::reshape;
use crate::error::CoreError;
use crate::state::{
    BookingTransition, CancellationPlan, CapacityLimits, ChangeContext, ConversionPlan,
    PaxChangePlan, StatusOutcome,
};
use tourbook_audit::BookingChange;
use tourbook_domain::{
    Booking, BookingStatus, Departure, DepartureId, DepartureType, Money, Tour, validate_pax,
};

/// Checks that a tour can be booked for a party and prices the party.
///
/// # Errors
///
/// Returns an error if:
/// - `pax` is zero
/// - The tour is inactive
/// - No pricing tier covers `pax`
pub fn quote_bookable(tour: &Tour, pax: u32) -> Result<Money, CoreError> {
    validate_pax(pax)?;

    if !tour.is_active {
        return Err(CoreError::TourNotBookable(tour.tour_id));
    }

    Ok(tour.quote(pax)?)
}

/// Checks that a booking has not been cancelled.
///
/// # Errors
///
/// Returns `CoreError::AlreadyCancelled` if the booking is cancelled.
pub const fn ensure_active(booking: &Booking) -> Result<(), CoreError> {
    if booking.is_active() {
        Ok(())
    } else {
        Err(CoreError::AlreadyCancelled(booking.booking_id))
    }
}

/// Reprices a booking for a new party size.
///
/// The discount is kept; `final_price` is recomputed from the new
/// `original_price`. The returned delta must be applied to the booking's
/// departure in the same transaction.
///
/// # Errors
///
/// Returns an error if:
/// - The booking is cancelled
/// - `new_pax` is zero
/// - No pricing tier of `tour` covers `new_pax`
pub fn plan_pax_change(
    booking: &Booking,
    tour: &Tour,
    new_pax: u32,
    ctx: &ChangeContext,
) -> Result<PaxChangePlan, CoreError> {
    ensure_active(booking)?;
    validate_pax(new_pax)?;

    let original_price: Money = tour.quote(new_pax)?;

    let mut updated: Booking = booking.clone();
    updated.pax = new_pax;
    updated.original_price = original_price;
    updated.final_price = original_price.saturating_sub(booking.discount);
    updated.updated_at = ctx.at;

    let event = ctx.event(BookingChange::PaxChange {
        before_pax: booking.pax,
        after_pax: new_pax,
        before_price: booking.original_price,
        after_price: original_price,
    });

    Ok(PaxChangePlan {
        transition: BookingTransition {
            booking: updated,
            event,
        },
        delta: i64::from(new_pax) - i64::from(booking.pax),
    })
}

/// Sets the absolute discount of a booking.
///
/// # Errors
///
/// Returns `CoreError::AlreadyCancelled` if the booking is cancelled.
pub fn plan_discount(
    booking: &Booking,
    discount: Money,
    ctx: &ChangeContext,
) -> Result<BookingTransition, CoreError> {
    ensure_active(booking)?;

    let mut updated: Booking = booking.clone();
    updated.discount = discount;
    updated.final_price = booking.original_price.saturating_sub(discount);
    updated.updated_at = ctx.at;

    let event = ctx.event(BookingChange::Discount {
        before_final_price: booking.final_price,
        after_final_price: updated.final_price,
        discount,
    });

    Ok(BookingTransition {
        booking: updated,
        event,
    })
}

/// Decides what a status update request does.
///
/// # Errors
///
/// Returns `CoreError::CannotReactivate` if the booking is cancelled and
/// any other status is requested, and `CoreError::AlreadyCancelled` if it is
/// cancelled and cancellation is requested again.
pub fn plan_status_change(
    booking: &Booking,
    target: BookingStatus,
    ctx: &ChangeContext,
) -> Result<StatusOutcome, CoreError> {
    if !booking.is_active() {
        if target == BookingStatus::Cancelled {
            return Err(CoreError::AlreadyCancelled(booking.booking_id));
        }
        return Err(CoreError::CannotReactivate {
            booking_id: booking.booking_id,
            requested: target,
        });
    }

    if target == booking.status {
        return Ok(StatusOutcome::Unchanged);
    }

    if target == BookingStatus::Cancelled {
        return Ok(StatusOutcome::Cancel);
    }

    let mut updated: Booking = booking.clone();
    updated.status = target;
    updated.updated_at = ctx.at;

    let event = ctx.event(BookingChange::StatusChange {
        before: booking.status,
        after: target,
    });

    Ok(StatusOutcome::Changed(BookingTransition {
        booking: updated,
        event,
    }))
}

/// Cancels a booking and decides the fate of its departure.
///
/// A private departure is cancelled together with its booking. A public
/// departure only gets its seats back.
///
/// # Errors
///
/// Returns an error if:
/// - The booking is already cancelled
/// - The booking does not reference `departure`
pub fn plan_cancellation(
    booking: &Booking,
    departure: &Departure,
    ctx: &ChangeContext,
) -> Result<CancellationPlan, CoreError> {
    ensure_active(booking)?;
    ensure_on_departure(booking, departure.departure_id)?;

    let remaining_after: u32 = departure.current_pax.saturating_sub(booking.pax);
    let cancel_departure: bool = departure.departure_type == DepartureType::Private
        && !departure.is_cancelled()
        && remaining_after == 0;

    Ok(cancellation(booking, departure.departure_id, cancel_departure, ctx))
}

/// Cancels every active booking on a departure that is itself being
/// cancelled.
///
/// Cancelled bookings in `bookings` are skipped. The caller releases each
/// plan's seats and then marks the departure cancelled.
///
/// # Errors
///
/// Returns an error if:
/// - The departure is already cancelled
/// - A booking does not reference `departure`
pub fn plan_departure_cancellation(
    departure: &Departure,
    bookings: &[Booking],
    ctx: &ChangeContext,
) -> Result<Vec<CancellationPlan>, CoreError> {
    if departure.is_cancelled() {
        return Err(CoreError::DepartureCancelled(departure.departure_id));
    }

    bookings
        .iter()
        .filter(|booking| booking.is_active())
        .map(|booking| {
            ensure_on_departure(booking, departure.departure_id)?;
            Ok(cancellation(booking, departure.departure_id, true, ctx))
        })
        .collect()
}

fn cancellation(
    booking: &Booking,
    departure_id: DepartureId,
    departure_cancelled: bool,
    ctx: &ChangeContext,
) -> CancellationPlan {
    let mut updated: Booking = booking.clone();
    updated.status = BookingStatus::Cancelled;
    updated.updated_at = ctx.at;

    let event = ctx.event(BookingChange::Cancellation {
        before_status: booking.status,
        departure_id,
        departure_cancelled,
    });

    CancellationPlan {
        transition: BookingTransition {
            booking: updated,
            event,
        },
        release: -i64::from(booking.pax),
        cancel_departure: departure_cancelled,
    }
}

/// Decides how a booking changes between public and private.
///
/// # Arguments
///
/// * `booking` - The booking to convert
/// * `departure` - The departure the booking currently holds seats on
/// * `co_occupants` - Other active bookings on the same departure
/// * `target` - The requested type
/// * `max_pax` - Explicit capacity for the converted departure
/// * `limits` - Configured capacity ceilings
/// * `ctx` - Change context
///
/// # Errors
///
/// Returns an error if:
/// - The booking is cancelled or not on `departure`
/// - The party does not fit the target capacity
pub fn plan_conversion(
    booking: &Booking,
    departure: &Departure,
    co_occupants: &[Booking],
    target: DepartureType,
    max_pax: Option<u32>,
    limits: CapacityLimits,
    ctx: &ChangeContext,
) -> Result<ConversionPlan, CoreError> {
    ensure_active(booking)?;
    ensure_on_departure(booking, departure.departure_id)?;

    if booking.booking_type == target && departure.departure_type == target {
        return Ok(ConversionPlan::Unchanged);
    }

    if target == DepartureType::Private {
        let ceiling: u32 = limits.capacity_for(DepartureType::Private, max_pax);
        if booking.pax > ceiling {
            return Err(CoreError::CapacityExceeded {
                departure_id: departure.departure_id,
                requested: booking.pax,
                current_pax: 0,
                max_pax: ceiling,
            });
        }
    }

    let sole_occupant: bool = co_occupants
        .iter()
        .all(|other| other.booking_id == booking.booking_id || !other.is_active());

    if !sole_occupant {
        return Ok(ConversionPlan::Detach {
            departure_type: target,
            max_pax: limits.capacity_for(target, max_pax),
        });
    }

    let in_place_max: u32 = match target {
        DepartureType::Private => limits.capacity_for(DepartureType::Private, max_pax),
        DepartureType::Public => {
            max_pax.unwrap_or_else(|| departure.max_pax.max(limits.default_public_max_pax))
        }
    };

    let reshaped: Departure = reshape(departure, target, in_place_max)?;
    let transition: BookingTransition =
        conversion_transition(booking, target, departure.departure_id, ctx);

    Ok(ConversionPlan::InPlace {
        departure: reshaped,
        transition,
    })
}

/// Rewrites a booking's type and departure for a conversion.
#[must_use]
pub fn conversion_transition(
    booking: &Booking,
    target: DepartureType,
    to_departure: DepartureId,
    ctx: &ChangeContext,
) -> BookingTransition {
    let mut updated: Booking = booking.clone();
    updated.booking_type = target;
    updated.departure_id = to_departure;
    updated.updated_at = ctx.at;

    let event = ctx.event(BookingChange::Conversion {
        before_type: booking.booking_type,
        after_type: target,
        from_departure: booking.departure_id,
        to_departure,
    });

    BookingTransition {
        booking: updated,
        event,
    }
}

/// Checks that a booking holds seats on the given departure.
///
/// # Errors
///
/// Returns `CoreError::BookingNotOnDeparture` otherwise.
pub fn ensure_on_departure(booking: &Booking, departure_id: DepartureId) -> Result<(), CoreError> {
    if booking.departure_id == departure_id {
        Ok(())
    } else {
        Err(CoreError::BookingNotOnDeparture {
            booking_id: booking.booking_id,
            departure_id,
        })
    }
}
