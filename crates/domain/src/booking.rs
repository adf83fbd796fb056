// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{BookingId, BookingStatus, Customer, DepartureId, DepartureType, Money, TourId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One customer's reservation against one departure.
///
/// The audit trail of a booking is kept separately as typed events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Canonical identifier.
    pub booking_id: BookingId,
    /// The departure holding this booking's seats.
    pub departure_id: DepartureId,
    /// The tour booked.
    pub tour_id: TourId,
    /// Root booking of the move chain this booking belongs to.
    ///
    /// Equal to `booking_id` unless the booking was created by a move.
    pub lineage_id: BookingId,
    /// Party size.
    pub pax: u32,
    /// Who booked.
    pub customer: Customer,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Mirrors the departure type at creation; rewritten by conversion.
    pub booking_type: DepartureType,
    /// Tier price for the party before discount.
    pub original_price: Money,
    /// Absolute discount granted.
    pub discount: Money,
    /// `original_price - discount`, floored at zero.
    pub final_price: Money,
    /// Booking this one was moved from.
    pub moved_from: Option<BookingId>,
    /// Booking this one was moved to.
    pub moved_to: Option<BookingId>,
    /// When the booking was created.
    pub created_at: OffsetDateTime,
    /// When the booking was last written.
    pub updated_at: OffsetDateTime,
}

impl Booking {
    /// Returns whether the booking still holds seats.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns whether two bookings belong to the same party.
    ///
    /// Bookings share a party only when they descend from the same booking
    /// through moves. A shared customer email does not make one party.
    #[must_use]
    pub fn same_party(&self, other: &Self) -> bool {
        self.lineage_id == other.lineage_id
    }
}

/// Values for a booking that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// The departure holding the seats.
    pub departure_id: DepartureId,
    /// The tour booked.
    pub tour_id: TourId,
    /// Root of the move chain, if created by a move.
    pub lineage_id: Option<BookingId>,
    /// Party size.
    pub pax: u32,
    /// Who booked.
    pub customer: Customer,
    /// Initial status.
    pub status: BookingStatus,
    /// Visibility mode booked.
    pub booking_type: DepartureType,
    /// Tier price for the party.
    pub original_price: Money,
    /// Discount carried over, if any.
    pub discount: Money,
    /// Booking this one replaces, if created by a move.
    pub moved_from: Option<BookingId>,
}

impl NewBooking {
    /// Returns the price after discount.
    #[must_use]
    pub const fn final_price(&self) -> Money {
        self.original_price.saturating_sub(self.discount)
    }
}
