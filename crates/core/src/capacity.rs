// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity rules for a single departure aggregate.
//!
//! These functions compute the next snapshot of a departure. They never
//! write; the persistence layer applies the result conditioned on the row
//! version the snapshot was read at.
//!
//! ## Invariants
//!
//! - `0 <= current_pax <= max_pax` after every transition
//! - Status is `full` exactly when `current_pax == max_pax`, unless cancelled
//! - A cancelled departure never takes seats and never leaves `cancelled`

use crate::error::CoreError;
use tourbook_domain::{Departure, DepartureStatus, DepartureType, validate_capacity};

/// Computes the snapshot that results from adding `delta` seats.
///
/// # Arguments
///
/// * `departure` - The snapshot the delta applies to
/// * `delta` - Seats to add (positive) or release (negative)
/// * `expected_status` - If given, the departure must currently be in it
///
/// # Errors
///
/// Returns an error if:
/// - The departure is not in `expected_status`
/// - Seats are added to a cancelled departure
/// - `current_pax + delta` exceeds `max_pax`
/// - `current_pax + delta` is negative
pub fn apply_capacity_delta(
    departure: &Departure,
    delta: i64,
    expected_status: Option<DepartureStatus>,
) -> Result<Departure, CoreError> {
    if let Some(expected) = expected_status
        && expected != departure.status
    {
        return Err(CoreError::UnexpectedDepartureStatus {
            departure_id: departure.departure_id,
            expected,
            actual: departure.status,
        });
    }

    if delta > 0 && departure.is_cancelled() {
        return Err(CoreError::DepartureCancelled(departure.departure_id));
    }

    let next: i64 = i64::from(departure.current_pax) + delta;

    if next < 0 {
        return Err(CoreError::CapacityUnderflow {
            departure_id: departure.departure_id,
            released: clamp_to_u32(delta.unsigned_abs()),
            current_pax: departure.current_pax,
        });
    }

    if next > i64::from(departure.max_pax) {
        return Err(CoreError::CapacityExceeded {
            departure_id: departure.departure_id,
            requested: clamp_to_u32(delta.unsigned_abs()),
            current_pax: departure.current_pax,
            max_pax: departure.max_pax,
        });
    }

    let current_pax: u32 = u32::try_from(next).map_err(|_| CoreError::CapacityExceeded {
        departure_id: departure.departure_id,
        requested: clamp_to_u32(delta.unsigned_abs()),
        current_pax: departure.current_pax,
        max_pax: departure.max_pax,
    })?;

    let mut updated: Departure = departure.clone();
    updated.current_pax = current_pax;
    updated.status = derived_status(departure.status, current_pax, departure.max_pax);
    Ok(updated)
}

/// Computes the snapshot that results from changing type and capacity.
///
/// Used by type conversion when the converting booking is the only
/// occupant of its departure.
///
/// # Errors
///
/// Returns an error if:
/// - The departure is cancelled
/// - `max_pax` is zero
/// - `max_pax` is below the seats already held
pub fn reshape(
    departure: &Departure,
    departure_type: DepartureType,
    max_pax: u32,
) -> Result<Departure, CoreError> {
    if departure.is_cancelled() {
        return Err(CoreError::DepartureCancelled(departure.departure_id));
    }

    validate_capacity(max_pax)?;

    if departure.current_pax > max_pax {
        return Err(CoreError::CapacityExceeded {
            departure_id: departure.departure_id,
            requested: departure.current_pax,
            current_pax: 0,
            max_pax,
        });
    }

    let mut updated: Departure = departure.clone();
    updated.departure_type = departure_type;
    updated.max_pax = max_pax;
    updated.status = DepartureStatus::for_capacity(departure.current_pax, max_pax);
    Ok(updated)
}

/// Computes the cancelled snapshot of a departure.
///
/// All seats must have been released through [`apply_capacity_delta`]
/// before a departure is cancelled.
///
/// # Errors
///
/// Returns an error if the departure is already cancelled or still holds seats.
pub fn cancel_departure(departure: &Departure) -> Result<Departure, CoreError> {
    if departure.is_cancelled() {
        return Err(CoreError::DepartureCancelled(departure.departure_id));
    }

    if departure.current_pax != 0 {
        return Err(CoreError::CapacityUnderflow {
            departure_id: departure.departure_id,
            released: 0,
            current_pax: departure.current_pax,
        });
    }

    let mut updated: Departure = departure.clone();
    updated.status = DepartureStatus::Cancelled;
    Ok(updated)
}

const fn derived_status(current: DepartureStatus, current_pax: u32, max_pax: u32) -> DepartureStatus {
    match current {
        DepartureStatus::Cancelled => DepartureStatus::Cancelled,
        DepartureStatus::Open | DepartureStatus::Full => {
            DepartureStatus::for_capacity(current_pax, max_pax)
        }
    }
}

fn clamp_to_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
