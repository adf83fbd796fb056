// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::date::DepartureDate;
use crate::types::{DepartureId, DepartureStatus, DepartureType, TourId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A snapshot of one scheduled occurrence of a tour on one date.
///
/// `version` is the optimistic concurrency token of the stored row. It
/// increases by one on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// Canonical identifier.
    pub departure_id: DepartureId,
    /// The tour this departure runs.
    pub tour_id: TourId,
    /// The day it runs.
    pub date: DepartureDate,
    /// Visibility mode.
    pub departure_type: DepartureType,
    /// Seat capacity.
    pub max_pax: u32,
    /// Seats held by active bookings.
    pub current_pax: u32,
    /// Open, full or cancelled.
    pub status: DepartureStatus,
    /// Row version.
    pub version: i64,
    /// When the departure was created.
    pub created_at: OffsetDateTime,
    /// When the departure was last written.
    pub updated_at: OffsetDateTime,
}

impl Departure {
    /// Returns the number of seats still free.
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.max_pax.saturating_sub(self.current_pax)
    }

    /// Returns whether the departure has been cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.status, DepartureStatus::Cancelled)
    }
}

/// Values for a departure that has not been stored yet.
///
/// New departures always start empty and open; seats are added through the
/// capacity primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeparture {
    /// The tour this departure runs.
    pub tour_id: TourId,
    /// The day it runs.
    pub date: DepartureDate,
    /// Visibility mode.
    pub departure_type: DepartureType,
    /// Seat capacity.
    pub max_pax: u32,
}

impl NewDeparture {
    /// Creates the values for a new, empty departure.
    #[must_use]
    pub const fn new(
        tour_id: TourId,
        date: DepartureDate,
        departure_type: DepartureType,
        max_pax: u32,
    ) -> Self {
        Self {
            tour_id,
            date,
            departure_type,
            max_pax,
        }
    }
}
