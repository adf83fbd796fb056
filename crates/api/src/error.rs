// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Errors returned across the engine boundary.
//!
//! Lower layers keep their own error types. Everything that leaves
//! [`crate::Engine`] is translated into [`EngineError`], whose
//! [`EngineError::code`] is the stable machine-readable identifier.

use thiserror::Error;
use tourbook::CoreError;
use tourbook_domain::{BookingId, BookingStatus, DepartureId, DomainError, TourId};
use tourbook_persistence::PersistenceError;

use crate::config::ConfigError;

/// Engine-level errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The departure cannot seat the requested party.
    #[error(
        "Departure {departure_id} cannot take {requested} more pax ({current_pax} of {max_pax} seated)"
    )]
    CapacityExceeded {
        /// The departure.
        departure_id: DepartureId,
        /// Seats requested.
        requested: u32,
        /// Seats held before the request.
        current_pax: u32,
        /// Capacity of the departure.
        max_pax: u32,
    },

    /// The booking is already cancelled.
    #[error("Booking {booking_id} is already cancelled")]
    AlreadyCancelled {
        /// The booking.
        booking_id: BookingId,
    },

    /// A cancelled booking was asked to become active again.
    #[error("Booking {booking_id} is cancelled and cannot become {requested}")]
    CannotReactivate {
        /// The booking.
        booking_id: BookingId,
        /// The status requested.
        requested: BookingStatus,
    },

    /// No pricing tier covers the party size.
    #[error("Tour {tour_id} has no pricing tier for {pax} pax")]
    NoPricingTier {
        /// The tour.
        tour_id: TourId,
        /// The party size.
        pax: u32,
    },

    /// A referenced record does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of record (`tour`, `departure` or `booking`).
        resource: &'static str,
        /// Its identifier.
        id: i64,
    },

    /// Every attempt of the operation conflicted with a concurrent writer.
    #[error("Operation abandoned after {attempts} conflicting attempts")]
    ContentionExceeded {
        /// Attempts made.
        attempts: u32,
    },

    /// A move cancelled its source booking but could not place the party.
    #[error("Booking {booking_id} was cancelled but its move failed: {cause}")]
    MovePartiallyFailed {
        /// The cancelled source booking.
        booking_id: BookingId,
        /// Why the destination could not be booked.
        #[source]
        cause: Box<Self>,
    },

    /// The departure is cancelled.
    #[error("Departure {departure_id} is cancelled")]
    DepartureCancelled {
        /// The departure.
        departure_id: DepartureId,
    },

    /// The tour is not taking bookings.
    #[error("Tour {tour_id} is not bookable")]
    TourNotBookable {
        /// The tour.
        tour_id: TourId,
    },

    /// The request itself is malformed or contradicts the stored state.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What is wrong with the request.
        message: String,
    },

    /// The store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// The underlying failure.
        message: String,
    },
}

impl EngineError {
    /// Returns the stable code identifying this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            Self::AlreadyCancelled { .. } => "ALREADY_CANCELLED",
            Self::CannotReactivate { .. } => "CANNOT_REACTIVATE",
            Self::NoPricingTier { .. } => "NO_PRICING_TIER",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ContentionExceeded { .. } => "CONTENTION_EXCEEDED",
            Self::MovePartiallyFailed { .. } => "MOVE_PARTIALLY_FAILED",
            Self::DepartureCancelled { .. } => "DEPARTURE_CANCELLED",
            Self::TourNotBookable { .. } => "TOUR_NOT_BOOKABLE",
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::Storage { .. } => "STORAGE",
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NoPricingTier { tour_id, pax } => Self::NoPricingTier { tour_id, pax },
            other => Self::invalid(other.to_string()),
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain) => domain.into(),
            CoreError::CapacityExceeded {
                departure_id,
                requested,
                current_pax,
                max_pax,
            } => Self::CapacityExceeded {
                departure_id,
                requested,
                current_pax,
                max_pax,
            },
            CoreError::DepartureCancelled(departure_id) => Self::DepartureCancelled { departure_id },
            CoreError::AlreadyCancelled(booking_id) => Self::AlreadyCancelled { booking_id },
            CoreError::CannotReactivate {
                booking_id,
                requested,
            } => Self::CannotReactivate {
                booking_id,
                requested,
            },
            CoreError::TourNotBookable(tour_id) => Self::TourNotBookable { tour_id },
            // Releasing more seats than are held means the aggregate and the
            // bookings disagree.
            CoreError::CapacityUnderflow { .. } => Self::Storage {
                message: err.to_string(),
            },
            CoreError::UnexpectedDepartureStatus { .. }
            | CoreError::BookingNotOnDeparture { .. }
            | CoreError::MixedParty { .. }
            | CoreError::EmptySelection { .. } => Self::invalid(err.to_string()),
        }
    }
}

impl From<PersistenceError> for EngineError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Rule(core) => core.into(),
            PersistenceError::TourNotFound(id) => Self::NotFound {
                resource: "tour",
                id: id.value(),
            },
            PersistenceError::DepartureNotFound(id) => Self::NotFound {
                resource: "departure",
                id: id.value(),
            },
            PersistenceError::BookingNotFound(id) => Self::NotFound {
                resource: "booking",
                id: id.value(),
            },
            PersistenceError::ContentionExceeded { attempts } => {
                Self::ContentionExceeded { attempts }
            }
            // Only writes outside the retry loop can surface a raw conflict.
            PersistenceError::Conflict(_) => Self::ContentionExceeded { attempts: 1 },
            other => Self::Storage {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        Self::invalid(err.to_string())
    }
}
