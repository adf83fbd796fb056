// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tourbook_domain::{
    BookingId, BookingStatus, DepartureId, DepartureStatus, DomainError, TourId,
};

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// Applying the delta would push the departure past its capacity.
    CapacityExceeded {
        /// The departure.
        departure_id: DepartureId,
        /// Seats requested on top of `current_pax`.
        requested: u32,
        /// Seats held before the request.
        current_pax: u32,
        /// Capacity of the departure.
        max_pax: u32,
    },
    /// Applying the delta would release more seats than are held.
    CapacityUnderflow {
        /// The departure.
        departure_id: DepartureId,
        /// Seats asked to be released.
        released: u32,
        /// Seats held before the request.
        current_pax: u32,
    },
    /// The departure is cancelled and takes no more seats.
    DepartureCancelled(DepartureId),
    /// The departure was not in the status the caller expected.
    UnexpectedDepartureStatus {
        /// The departure.
        departure_id: DepartureId,
        /// Status the caller required.
        expected: DepartureStatus,
        /// Status found.
        actual: DepartureStatus,
    },
    /// The booking is already cancelled.
    AlreadyCancelled(BookingId),
    /// A cancelled booking cannot return to an active status.
    CannotReactivate {
        /// The booking.
        booking_id: BookingId,
        /// Status that was requested.
        requested: BookingStatus,
    },
    /// The booking does not hold seats on the given departure.
    BookingNotOnDeparture {
        /// The booking.
        booking_id: BookingId,
        /// The departure it was expected on.
        departure_id: DepartureId,
    },
    /// A private departure would host more than one party.
    MixedParty {
        /// The departure the bookings came from.
        departure_id: DepartureId,
    },
    /// A split selected no bookings.
    EmptySelection {
        /// The departure being split.
        departure_id: DepartureId,
    },
    /// The tour is not taking bookings.
    TourNotBookable(TourId),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::CapacityExceeded {
                departure_id,
                requested,
                current_pax,
                max_pax,
            } => write!(
                f,
                "Departure {departure_id} cannot take {requested} more pax: {current_pax}/{max_pax} held"
            ),
            Self::CapacityUnderflow {
                departure_id,
                released,
                current_pax,
            } => write!(
                f,
                "Departure {departure_id} cannot release {released} pax: only {current_pax} held"
            ),
            Self::DepartureCancelled(departure_id) => {
                write!(f, "Departure {departure_id} is cancelled")
            }
            Self::UnexpectedDepartureStatus {
                departure_id,
                expected,
                actual,
            } => write!(
                f,
                "Departure {departure_id} is {actual}, expected {expected}"
            ),
            Self::AlreadyCancelled(booking_id) => {
                write!(f, "Booking {booking_id} is already cancelled")
            }
            Self::CannotReactivate {
                booking_id,
                requested,
            } => write!(
                f,
                "Booking {booking_id} is cancelled and cannot become {requested}"
            ),
            Self::BookingNotOnDeparture {
                booking_id,
                departure_id,
            } => write!(
                f,
                "Booking {booking_id} holds no seats on departure {departure_id}"
            ),
            Self::MixedParty { departure_id } => write!(
                f,
                "Bookings selected from departure {departure_id} belong to more than one party"
            ),
            Self::EmptySelection { departure_id } => {
                write!(f, "No bookings selected from departure {departure_id}")
            }
            Self::TourNotBookable(tour_id) => {
                write!(f, "Tour {tour_id} is not taking bookings")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
