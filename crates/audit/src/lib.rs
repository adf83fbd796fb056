// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Booking audit trail.
//!
//! Every mutation of a booking appends [`BookingEvent`]s to the booking's
//! history; a move appends one per aspect that changed. Events are immutable once created and are never
//! removed; the history of a booking is the ordered list of its events.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tourbook_domain::{
    BookingStatus, DepartureDate, DepartureId, DepartureType, Money, TourId,
};

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change.
/// This could be an operator, a customer self-service flow, or a system job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "customer", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// What changed on a booking.
///
/// Each variant carries the before/after references needed to reconstruct
/// the booking's path without consulting any other table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BookingChange {
    /// The booking was created on a departure.
    Created {
        /// Departure the seats were taken on.
        departure_id: DepartureId,
        /// Party size.
        pax: u32,
        /// Visibility mode booked.
        booking_type: DepartureType,
    },
    /// Party size changed and the price was recomputed.
    PaxChange {
        /// Party size before.
        before_pax: u32,
        /// Party size after.
        after_pax: u32,
        /// Tier price before.
        before_price: Money,
        /// Tier price after.
        after_price: Money,
    },
    /// A discount was applied.
    Discount {
        /// Final price before.
        before_final_price: Money,
        /// Final price after.
        after_final_price: Money,
        /// Discount now in effect.
        discount: Money,
    },
    /// Lifecycle status changed between active statuses.
    StatusChange {
        /// Status before.
        before: BookingStatus,
        /// Status after.
        after: BookingStatus,
    },
    /// The booking was cancelled and its seats released.
    Cancellation {
        /// Status before cancellation.
        before_status: BookingStatus,
        /// Departure the seats were released from.
        departure_id: DepartureId,
        /// Whether the departure was cancelled as a consequence.
        departure_cancelled: bool,
    },
    /// The booking was moved to another date.
    DateChange {
        /// Departure before.
        from_departure: DepartureId,
        /// Departure after.
        to_departure: DepartureId,
        /// Date before.
        from_date: DepartureDate,
        /// Date after.
        to_date: DepartureDate,
    },
    /// The booking was moved to another tour.
    TourChange {
        /// Tour before.
        from_tour: TourId,
        /// Tour after.
        to_tour: TourId,
        /// Departure before.
        from_departure: DepartureId,
        /// Departure after.
        to_departure: DepartureId,
    },
    /// The booking changed between public and private.
    Conversion {
        /// Type before.
        before_type: DepartureType,
        /// Type after.
        after_type: DepartureType,
        /// Departure before.
        from_departure: DepartureId,
        /// Departure after (same as before when converted in place).
        to_departure: DepartureId,
    },
    /// The booking was split off onto a new departure.
    Split {
        /// Departure before.
        from_departure: DepartureId,
        /// Departure after.
        to_departure: DepartureId,
    },
}

impl BookingChange {
    /// Returns the stable name of this change kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "Created",
            Self::PaxChange { .. } => "PaxChange",
            Self::Discount { .. } => "Discount",
            Self::StatusChange { .. } => "StatusChange",
            Self::Cancellation { .. } => "Cancellation",
            Self::DateChange { .. } => "DateChange",
            Self::TourChange { .. } => "TourChange",
            Self::Conversion { .. } => "Conversion",
            Self::Split { .. } => "Split",
        }
    }
}

/// An immutable entry in a booking's `previous_states` log.
///
/// Captures:
/// - When the change happened (at)
/// - Who performed it (actor)
/// - Why, when the caller said so (reason)
/// - What changed, with before/after references (change)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingEvent {
    /// When the change was committed.
    pub at: OffsetDateTime,
    /// The actor who initiated the change.
    pub actor: Actor,
    /// Free-text reason supplied by the caller.
    pub reason: Option<String>,
    /// The change itself.
    pub change: BookingChange,
}

impl BookingEvent {
    /// Creates a new `BookingEvent`.
    ///
    /// # Arguments
    ///
    /// * `at` - When the change was committed
    /// * `actor` - The actor who initiated the change
    /// * `reason` - Optional reason supplied by the caller
    /// * `change` - The change performed
    #[must_use]
    pub const fn new(
        at: OffsetDateTime,
        actor: Actor,
        reason: Option<String>,
        change: BookingChange,
    ) -> Self {
        Self {
            at,
            actor,
            reason,
            change,
        }
    }

    /// Returns the stable name of this event's change kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.change.kind()
    }
}
