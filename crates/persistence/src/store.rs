// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The transactional handle operations run against.

use diesel::SqliteConnection;
use time::OffsetDateTime;
use tourbook::BookingTransition;
use tourbook_audit::BookingEvent;
use tourbook_domain::{
    Booking, BookingId, Departure, DepartureDate, DepartureId, DepartureStatus, NewBooking,
    NewDeparture, Tour, TourId,
};

use crate::error::PersistenceError;
use crate::mutations::{bookings as booking_mutations, departures as departure_mutations};
use crate::queries::{bookings as booking_queries, departures as departure_queries, tours};

/// A store handle bound to one open transaction.
///
/// Every departure write goes through [`StoreTx::apply_capacity_delta`],
/// [`StoreTx::set_departure_shape`] or [`StoreTx::mark_departure_cancelled`],
/// each of which is conditioned on the version the snapshot was read at.
pub struct StoreTx<'a> {
    conn: &'a mut SqliteConnection,
    now: OffsetDateTime,
}

impl<'a> StoreTx<'a> {
    pub(crate) const fn new(conn: &'a mut SqliteConnection, now: OffsetDateTime) -> Self {
        Self { conn, now }
    }

    /// The timestamp every write of this attempt is stamped with.
    #[must_use]
    pub const fn now(&self) -> OffsetDateTime {
        self.now
    }

    /// Loads a tour and its pricing tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the tour does not exist or the query fails.
    pub fn get_tour(&mut self, tour_id: TourId) -> Result<Tour, PersistenceError> {
        tours::get_tour(self.conn, tour_id)
    }

    /// Reads the current snapshot of a departure.
    ///
    /// # Errors
    ///
    /// Returns an error if the departure does not exist or the query fails.
    pub fn read_departure(&mut self, departure_id: DepartureId) -> Result<Departure, PersistenceError> {
        departure_queries::get_departure(self.conn, departure_id)
    }

    /// Finds the open public departure a party of `pax` can join.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_joinable_departure(
        &mut self,
        tour_id: TourId,
        date: DepartureDate,
        pax: u32,
    ) -> Result<Option<Departure>, PersistenceError> {
        departure_queries::find_joinable_departure(self.conn, tour_id, date, pax)
    }

    /// Lists the departures of a tour, optionally on one date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_departures(
        &mut self,
        tour_id: TourId,
        date: Option<DepartureDate>,
    ) -> Result<Vec<Departure>, PersistenceError> {
        departure_queries::list_departures(self.conn, tour_id, date)
    }

    /// Inserts a new, empty departure.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity is zero or the insert fails.
    pub fn insert_departure(&mut self, departure: &NewDeparture) -> Result<Departure, PersistenceError> {
        departure_mutations::insert_departure(self.conn, departure, self.now)
    }

    /// Adds `delta` seats to a departure and returns the stored snapshot.
    ///
    /// The snapshot is read, checked by [`tourbook::apply_capacity_delta`],
    /// and written back conditioned on the version read.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Rule` if a capacity rule rejects the delta,
    /// `PersistenceError::Conflict` if the row changed concurrently, or
    /// another error if the departure does not exist or the write fails.
    pub fn apply_capacity_delta(
        &mut self,
        departure_id: DepartureId,
        delta: i64,
        expected_status: Option<DepartureStatus>,
    ) -> Result<Departure, PersistenceError> {
        let current: Departure = self.read_departure(departure_id)?;
        let next: Departure = tourbook::apply_capacity_delta(&current, delta, expected_status)?;
        departure_mutations::write_departure(self.conn, &next, current.version, self.now)
    }

    /// Writes a reshaped departure (type and capacity change).
    ///
    /// `reshaped` must carry the version it was derived from.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Conflict` if the row changed since it was
    /// read, or another error if the write fails.
    pub fn set_departure_shape(&mut self, reshaped: &Departure) -> Result<Departure, PersistenceError> {
        departure_mutations::write_departure(self.conn, reshaped, reshaped.version, self.now)
    }

    /// Marks an empty departure cancelled.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Rule` if the departure is already cancelled
    /// or still holds seats, and `PersistenceError::Conflict` if the row
    /// changed concurrently.
    pub fn mark_departure_cancelled(
        &mut self,
        departure_id: DepartureId,
    ) -> Result<Departure, PersistenceError> {
        let current: Departure = self.read_departure(departure_id)?;
        let next: Departure = tourbook::cancel_departure(&current)?;
        departure_mutations::write_departure(self.conn, &next, current.version, self.now)
    }

    /// Reads a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist or the query fails.
    pub fn get_booking(&mut self, booking_id: BookingId) -> Result<Booking, PersistenceError> {
        booking_queries::get_booking(self.conn, booking_id)
    }

    /// Lists the bookings that hold seats on a departure.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_bookings(&mut self, departure_id: DepartureId) -> Result<Vec<Booking>, PersistenceError> {
        booking_queries::active_bookings(self.conn, departure_id)
    }

    /// Lists every booking on a departure, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings(&mut self, departure_id: DepartureId) -> Result<Vec<Booking>, PersistenceError> {
        booking_queries::list_bookings(self.conn, departure_id)
    }

    /// Sums the party sizes of the active bookings on a departure.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_pax_sum(&mut self, departure_id: DepartureId) -> Result<u32, PersistenceError> {
        booking_queries::active_pax_sum(self.conn, departure_id)
    }

    /// Loads the audit history of a booking, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn booking_history(&mut self, booking_id: BookingId) -> Result<Vec<BookingEvent>, PersistenceError> {
        booking_queries::booking_history(self.conn, booking_id)
    }

    /// Inserts a booking together with its first audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the values are invalid or a write fails.
    pub fn insert_booking(
        &mut self,
        booking: &NewBooking,
        created: &BookingEvent,
    ) -> Result<Booking, PersistenceError> {
        let stored: Booking = booking_mutations::insert_booking(self.conn, booking, self.now)?;
        booking_mutations::append_booking_event(self.conn, stored.booking_id, created)?;
        Ok(stored)
    }

    /// Writes a booking without recording an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist or the write fails.
    pub fn update_booking(&mut self, booking: &Booking) -> Result<(), PersistenceError> {
        booking_mutations::update_booking(self.conn, booking)
    }

    /// Appends an audit event to a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be stored.
    pub fn append_event(&mut self, booking_id: BookingId, event: &BookingEvent) -> Result<(), PersistenceError> {
        booking_mutations::append_booking_event(self.conn, booking_id, event)
    }

    /// Writes a transitioned booking and appends its event.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails.
    pub fn record(&mut self, transition: &BookingTransition) -> Result<(), PersistenceError> {
        self.update_booking(&transition.booking)?;
        self.append_event(transition.booking.booking_id, &transition.event)
    }
}
