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
#![allow(clippy::multiple_crate_versions)]

//! Boundary of the Tourbook departure engine.
//!
//! [`Engine`] owns a store handle and exposes every capacity and booking
//! operation. Each operation runs in its own retried transaction, except
//! [`Engine::move_booking`], which runs two. Authorization is the caller's
//! concern; every mutating call takes the [`Actor`] recorded in the audit
//! trail.

mod allocator;
mod cascade;
mod config;
mod error;
mod request_response;
mod transfer;

#[cfg(test)]
mod tests;

pub use config::{ConfigError, EngineConfig, RetryConfig};
pub use error::EngineError;
pub use request_response::{
    InvariantReport, JoinRequest, JoinResponse, MoveDestination, MoveResponse, SplitResponse,
    SplitTarget,
};

use std::path::Path;
use tourbook::{CapacityLimits, ChangeContext};
use tourbook_audit::{Actor, BookingEvent};
use tourbook_domain::{
    Booking, BookingId, BookingStatus, Departure, DepartureDate, DepartureId, DepartureType,
    Money, NewDeparture, Tour, TourId,
};
use tourbook_persistence::{Persistence, StoreTx};
use tracing::{info, warn};

use crate::allocator::Inheritance;
use crate::transfer::Released;

/// The departure capacity and booking lifecycle engine.
pub struct Engine {
    persistence: Persistence,
    config: EngineConfig,
}

impl Engine {
    /// Opens an engine on a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the database
    /// cannot be initialized.
    pub fn open_in_memory(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let persistence: Persistence =
            Persistence::new_in_memory_with_options(config.store_options())?;
        Ok(Self {
            persistence,
            config,
        })
    }

    /// Opens an engine on a database file, creating it if needed.
    ///
    /// Several engines may be opened on the same file, one per thread.
    ///
    /// # Arguments
    ///
    /// * `path` - The `SQLite` database file
    /// * `config` - Engine settings
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the database
    /// cannot be opened or migrated.
    pub fn open_file<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let persistence: Persistence =
            Persistence::new_with_file_and_options(path, config.store_options())?;
        Ok(Self {
            persistence,
            config,
        })
    }

    /// The configuration this engine runs with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    const fn limits(&self) -> CapacityLimits {
        self.config.capacity_limits()
    }

    /// Inserts or replaces a catalog tour.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_tour(&mut self, tour: &Tour) -> Result<(), EngineError> {
        self.persistence.upsert_tour(tour)?;
        info!(tour_id = %tour.tour_id, tiers = tour.price_table.tiers().len(), "Upserted tour");
        Ok(())
    }

    /// Loads a catalog tour.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` if the tour does not exist.
    pub fn get_tour(&mut self, tour_id: TourId) -> Result<Tour, EngineError> {
        Ok(self.persistence.get_tour(tour_id)?)
    }

    /// Seats a party, joining an open public departure when one has room and
    /// creating a departure otherwise.
    ///
    /// # Arguments
    ///
    /// * `request` - Tour, date, type, party and placement options
    /// * `actor` - Who is booking
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The party size is zero or no tier prices it
    /// - The tour does not exist or is inactive
    /// - The party does not fit a new departure of the requested type
    /// - Every attempt conflicted with concurrent writers
    pub fn create_or_join_departure(
        &mut self,
        request: &JoinRequest,
        actor: &Actor,
    ) -> Result<JoinResponse, EngineError> {
        let limits: CapacityLimits = self.limits();
        let response: JoinResponse =
            self.persistence
                .transaction("create_or_join_departure", |tx| {
                    let ctx: ChangeContext = context(tx, actor, None);
                    allocator::join(tx, limits, request, Inheritance::FRESH, &ctx)
                })?;

        info!(
            booking_id = %response.booking.booking_id,
            departure_id = %response.departure.departure_id,
            pax = request.pax,
            current_pax = response.departure.current_pax,
            "Seated party"
        );
        Ok(response)
    }

    /// Creates an empty departure.
    ///
    /// `max_pax` defaults to the configured capacity for the type.
    ///
    /// # Errors
    ///
    /// Returns an error if the tour does not exist or is inactive, or the
    /// capacity is zero.
    pub fn create_departure(
        &mut self,
        tour_id: TourId,
        date: DepartureDate,
        departure_type: DepartureType,
        max_pax: Option<u32>,
    ) -> Result<Departure, EngineError> {
        let new_departure: NewDeparture = NewDeparture::new(
            tour_id,
            date,
            departure_type,
            self.limits().capacity_for(departure_type, max_pax),
        );
        let departure: Departure = self
            .persistence
            .transaction("create_departure", |tx| allocator::create_empty(tx, &new_departure))?;

        info!(
            departure_id = %departure.departure_id,
            tour_id = %tour_id,
            date = %date,
            max_pax = departure.max_pax,
            "Created departure"
        );
        Ok(departure)
    }

    /// Cancels a departure together with every active booking on it.
    ///
    /// # Errors
    ///
    /// Returns `DEPARTURE_CANCELLED` if it is already cancelled.
    pub fn cancel_departure(
        &mut self,
        departure_id: DepartureId,
        actor: &Actor,
        reason: Option<&str>,
    ) -> Result<Departure, EngineError> {
        let departure: Departure = self.persistence.transaction("cancel_departure", |tx| {
            let ctx: ChangeContext = context(tx, actor, reason);
            cascade::cancel_departure(tx, departure_id, &ctx)
        })?;

        info!(departure_id = %departure_id, "Cancelled departure");
        Ok(departure)
    }

    /// Changes a booking's party size and reprices it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The booking is cancelled
    /// - The new size is zero or no tier prices it
    /// - The departure cannot seat the difference
    pub fn update_booking_pax(
        &mut self,
        booking_id: BookingId,
        new_pax: u32,
        actor: &Actor,
    ) -> Result<Booking, EngineError> {
        let booking: Booking = self.persistence.transaction("update_booking_pax", |tx| {
            let ctx: ChangeContext = context(tx, actor, None);
            cascade::update_pax(tx, booking_id, new_pax, &ctx)
        })?;

        info!(
            booking_id = %booking_id,
            pax = booking.pax,
            original_price = %booking.original_price,
            "Updated booking pax"
        );
        Ok(booking)
    }

    /// Sets a booking's discount.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist or is cancelled.
    pub fn apply_discount(
        &mut self,
        booking_id: BookingId,
        discount: Money,
        actor: &Actor,
    ) -> Result<Booking, EngineError> {
        let booking: Booking = self.persistence.transaction("apply_discount", |tx| {
            let ctx: ChangeContext = context(tx, actor, None);
            cascade::apply_discount(tx, booking_id, discount, &ctx)
        })?;

        info!(
            booking_id = %booking_id,
            discount = %discount,
            final_price = %booking.final_price,
            "Applied discount"
        );
        Ok(booking)
    }

    /// Cancels a booking and releases its seats.
    ///
    /// A private departure is cancelled once its last booking is.
    ///
    /// # Errors
    ///
    /// Returns `ALREADY_CANCELLED` if the booking is already cancelled.
    pub fn cancel_booking(
        &mut self,
        booking_id: BookingId,
        actor: &Actor,
        reason: Option<&str>,
    ) -> Result<Booking, EngineError> {
        let (booking, departure) = self.persistence.transaction("cancel_booking", |tx| {
            let ctx: ChangeContext = context(tx, actor, reason);
            let booking: Booking = tx.get_booking(booking_id)?;
            cascade::cancel(tx, &booking, &ctx)
        })?;

        info!(
            booking_id = %booking_id,
            departure_id = %departure.departure_id,
            departure_status = %departure.status,
            "Cancelled booking"
        );
        Ok(booking)
    }

    /// Moves a booking to another status.
    ///
    /// Requesting `Cancelled` runs the cancellation cascade. Requesting the
    /// current status returns the booking unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ALREADY_CANCELLED` or `CANNOT_REACTIVATE` for a cancelled
    /// booking.
    pub fn update_booking_status(
        &mut self,
        booking_id: BookingId,
        status: BookingStatus,
        actor: &Actor,
    ) -> Result<Booking, EngineError> {
        let booking: Booking = self.persistence.transaction("update_booking_status", |tx| {
            let ctx: ChangeContext = context(tx, actor, None);
            cascade::update_status(tx, booking_id, status, &ctx)
        })?;

        info!(booking_id = %booking_id, status = %booking.status, "Updated booking status");
        Ok(booking)
    }

    /// Converts a booking between public and private.
    ///
    /// A booking alone on its departure converts the departure in place;
    /// a booking sharing it is detached onto a new departure.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking is cancelled or its party exceeds the
    /// private ceiling (or `max_pax`).
    pub fn convert_booking_type(
        &mut self,
        booking_id: BookingId,
        target: DepartureType,
        max_pax: Option<u32>,
        actor: &Actor,
    ) -> Result<Booking, EngineError> {
        let limits: CapacityLimits = self.limits();
        let booking: Booking = self.persistence.transaction("convert_booking_type", |tx| {
            let ctx: ChangeContext = context(tx, actor, None);
            cascade::convert(tx, limits, booking_id, target, max_pax, &ctx)
        })?;

        info!(
            booking_id = %booking_id,
            booking_type = %booking.booking_type,
            departure_id = %booking.departure_id,
            "Converted booking"
        );
        Ok(booking)
    }

    /// Moves a booking to another date, tour or type.
    ///
    /// The source booking is cancelled first and a replacement is then
    /// seated through create-or-join. Destination checks that can be made
    /// up front run before anything is cancelled.
    ///
    /// # Errors
    ///
    /// Returns the first phase's own error when nothing changed, and
    /// `MOVE_PARTIALLY_FAILED` when the source was cancelled but the
    /// replacement could not be seated.
    pub fn move_booking(
        &mut self,
        booking_id: BookingId,
        destination: &MoveDestination,
        actor: &Actor,
        reason: Option<&str>,
    ) -> Result<MoveResponse, EngineError> {
        let limits: CapacityLimits = self.limits();

        let released: Released = self.persistence.transaction("move_booking.release", |tx| {
            let ctx: ChangeContext = context(tx, actor, reason);
            transfer::release(tx, limits, booking_id, destination, &ctx)
        })?;

        let placed = self.persistence.transaction("move_booking.place", |tx| {
            let ctx: ChangeContext = context(tx, actor, reason);
            transfer::place(tx, limits, &released, &ctx)
        });

        match placed {
            Ok(response) => {
                info!(
                    booking_id = %booking_id,
                    new_booking_id = %response.booking.booking_id,
                    departure_id = %response.departure.departure_id,
                    "Moved booking"
                );
                Ok(response)
            }
            Err(err) => {
                let cause: EngineError = err.into();
                warn!(booking_id = %booking_id, error = %cause, "Move left source cancelled");
                Err(EngineError::MovePartiallyFailed {
                    booking_id,
                    cause: Box::new(cause),
                })
            }
        }
    }

    /// Moves the selected bookings of a departure onto a new departure.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REQUEST` for an empty selection, a booking that is
    /// not on the departure, or mixed parties for a private target, and
    /// `CAPACITY_EXCEEDED` if the new departure cannot hold the selection.
    pub fn split_departure(
        &mut self,
        departure_id: DepartureId,
        booking_ids: &[BookingId],
        target: SplitTarget,
        actor: &Actor,
    ) -> Result<SplitResponse, EngineError> {
        let limits: CapacityLimits = self.limits();
        let response: SplitResponse = self.persistence.transaction("split_departure", |tx| {
            let ctx: ChangeContext = context(tx, actor, None);
            transfer::split(tx, limits, departure_id, booking_ids, target, &ctx)
        })?;

        info!(
            departure_id = %departure_id,
            new_departure_id = %response.target.departure_id,
            bookings = response.bookings.len(),
            "Split departure"
        );
        Ok(response)
    }

    /// Reads a departure.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` if the departure does not exist.
    pub fn get_departure(&mut self, departure_id: DepartureId) -> Result<Departure, EngineError> {
        Ok(self.persistence.get_departure(departure_id)?)
    }

    /// Reads a booking.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` if the booking does not exist.
    pub fn get_booking(&mut self, booking_id: BookingId) -> Result<Booking, EngineError> {
        Ok(self.persistence.get_booking(booking_id)?)
    }

    /// Lists a tour's departures, optionally on one date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_departures(
        &mut self,
        tour_id: TourId,
        date: Option<DepartureDate>,
    ) -> Result<Vec<Departure>, EngineError> {
        Ok(self.persistence.list_departures(tour_id, date)?)
    }

    /// Lists every booking on a departure, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings(&mut self, departure_id: DepartureId) -> Result<Vec<Booking>, EngineError> {
        Ok(self.persistence.list_bookings(departure_id)?)
    }

    /// Returns a booking's audit trail, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` if the booking does not exist.
    pub fn booking_history(&mut self, booking_id: BookingId) -> Result<Vec<BookingEvent>, EngineError> {
        Ok(self.persistence.booking_history(booking_id)?)
    }

    /// Recomputes a departure's seat count from its bookings.
    ///
    /// # Errors
    ///
    /// Returns `NOT_FOUND` if the departure does not exist.
    pub fn verify_departure_invariants(
        &mut self,
        departure_id: DepartureId,
    ) -> Result<InvariantReport, EngineError> {
        let report: InvariantReport =
            self.persistence
                .transaction("verify_departure_invariants", |tx| {
                    let departure: Departure = tx.read_departure(departure_id)?;
                    Ok(InvariantReport {
                        departure_id,
                        current_pax: departure.current_pax,
                        max_pax: departure.max_pax,
                        active_pax: tx.active_pax_sum(departure_id)?,
                    })
                })?;

        if !report.is_consistent() {
            warn!(
                departure_id = %departure_id,
                current_pax = report.current_pax,
                active_pax = report.active_pax,
                max_pax = report.max_pax,
                "Departure aggregate disagrees with its bookings"
            );
        }
        Ok(report)
    }
}

fn context(tx: &StoreTx<'_>, actor: &Actor, reason: Option<&str>) -> ChangeContext {
    ChangeContext::new(tx.now(), actor.clone(), reason.map(str::to_owned))
}
