// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use tourbook_audit::{Actor, BookingChange, BookingEvent};
use tourbook_domain::{Booking, Departure, DepartureType};

/// Who is changing a booking, when, and why.
///
/// Every transition stamps its audit event from this context so the events
/// of one operation share a timestamp and actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeContext {
    /// When the change is being made.
    pub at: OffsetDateTime,
    /// The actor initiating the change.
    pub actor: Actor,
    /// Free-text reason supplied by the caller.
    pub reason: Option<String>,
}

impl ChangeContext {
    /// Creates a new change context.
    ///
    /// # Arguments
    ///
    /// * `at` - When the change is being made
    /// * `actor` - The actor initiating the change
    /// * `reason` - Optional reason supplied by the caller
    #[must_use]
    pub const fn new(at: OffsetDateTime, actor: Actor, reason: Option<String>) -> Self {
        Self { at, actor, reason }
    }

    /// Builds the audit event for a change made in this context.
    #[must_use]
    pub fn event(&self, change: BookingChange) -> BookingEvent {
        BookingEvent::new(self.at, self.actor.clone(), self.reason.clone(), change)
    }
}

/// Capacity ceilings applied when departures are created or reshaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityLimits {
    /// Capacity of a private departure when no override is given.
    pub private_max_pax: u32,
    /// Capacity of a new public departure when no override is given.
    pub default_public_max_pax: u32,
}

impl CapacityLimits {
    /// Creates a new set of capacity ceilings.
    #[must_use]
    pub const fn new(private_max_pax: u32, default_public_max_pax: u32) -> Self {
        Self {
            private_max_pax,
            default_public_max_pax,
        }
    }

    /// Capacity for a newly created departure of the given type.
    #[must_use]
    pub fn capacity_for(&self, departure_type: DepartureType, max_pax: Option<u32>) -> u32 {
        max_pax.unwrap_or(match departure_type {
            DepartureType::Private => self.private_max_pax,
            DepartureType::Public => self.default_public_max_pax,
        })
    }
}

/// The result of a successful booking transition.
///
/// Transitions are atomic: the caller persists the booking and the event
/// together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingTransition {
    /// The booking after the transition.
    pub booking: Booking,
    /// The audit event recording this transition.
    pub event: BookingEvent,
}

/// A pax change: the repriced booking and the seats it moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaxChangePlan {
    /// The repriced booking and its `PaxChange` event.
    pub transition: BookingTransition,
    /// Seats to add to (or release from) the booking's departure.
    pub delta: i64,
}

/// A cancellation: the cancelled booking and what happens to its departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationPlan {
    /// The cancelled booking and its `Cancellation` event.
    pub transition: BookingTransition,
    /// Seats to release from the departure (always negative or zero).
    pub release: i64,
    /// Whether the departure is cancelled once the seats are released.
    pub cancel_departure: bool,
}

/// Outcome of a status update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    /// The booking already has the requested status.
    Unchanged,
    /// Moved between active statuses.
    Changed(BookingTransition),
    /// The request is a cancellation and must run the cancellation cascade.
    Cancel,
}

/// How a type conversion is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionPlan {
    /// The booking already has the requested type.
    Unchanged,
    /// The booking is the only occupant; its departure is rewritten.
    InPlace {
        /// The reshaped departure.
        departure: Departure,
        /// The converted booking and its `Conversion` event.
        transition: BookingTransition,
    },
    /// The departure is shared; the booking moves to a new departure.
    Detach {
        /// Type of the new departure.
        departure_type: DepartureType,
        /// Capacity of the new departure.
        max_pax: u32,
    },
}
