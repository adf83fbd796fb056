// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine request and response data transfer objects.

use serde::Serialize;
use tourbook_domain::{
    Booking, Customer, Departure, DepartureDate, DepartureId, DepartureType, TourId,
};

/// Request to seat a party on a departure, creating one if needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// The tour booked.
    pub tour_id: TourId,
    /// The day of the departure.
    pub date: DepartureDate,
    /// Public joins an existing departure when one has room; private always
    /// gets its own.
    pub departure_type: DepartureType,
    /// Party size.
    pub pax: u32,
    /// Who is booking.
    pub customer: Customer,
    /// Always create a new departure, even for a public booking.
    pub force_new_departure: bool,
    /// Capacity of a newly created departure, overriding the configured one.
    pub max_pax: Option<u32>,
}

impl JoinRequest {
    /// Creates a request with no forcing and no capacity override.
    #[must_use]
    pub const fn new(
        tour_id: TourId,
        date: DepartureDate,
        departure_type: DepartureType,
        pax: u32,
        customer: Customer,
    ) -> Self {
        Self {
            tour_id,
            date,
            departure_type,
            pax,
            customer,
            force_new_departure: false,
            max_pax: None,
        }
    }
}

/// Result of a successful create-or-join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinResponse {
    /// The departure the party was seated on, after seating.
    pub departure: Departure,
    /// The new booking.
    pub booking: Booking,
}

/// Where a booking is moved to. Unset fields keep the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveDestination {
    /// Destination tour.
    pub tour_id: Option<TourId>,
    /// Destination date.
    pub date: Option<DepartureDate>,
    /// Destination visibility mode.
    pub departure_type: Option<DepartureType>,
}

/// Result of a completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResponse {
    /// The cancelled source booking.
    pub source: Booking,
    /// The replacement booking.
    pub booking: Booking,
    /// The departure the replacement holds seats on.
    pub departure: Departure,
}

/// Shape of the departure a split creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitTarget {
    /// Type of the new departure.
    pub departure_type: DepartureType,
    /// Capacity of the new departure, overriding the configured one.
    pub max_pax: Option<u32>,
}

/// Result of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitResponse {
    /// The departure the bookings left.
    pub source: Departure,
    /// The departure created for them.
    pub target: Departure,
    /// The moved bookings, in request order.
    pub bookings: Vec<Booking>,
}

/// Recomputed capacity figures of one departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvariantReport {
    /// The departure checked.
    pub departure_id: DepartureId,
    /// Stored seat count.
    pub current_pax: u32,
    /// Stored capacity.
    pub max_pax: u32,
    /// Sum of party sizes over active bookings.
    pub active_pax: u32,
}

impl InvariantReport {
    /// Whether the stored aggregate matches its bookings and capacity.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.current_pax == self.active_pax && self.current_pax <= self.max_pax
    }
}
