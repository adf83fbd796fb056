// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Tourbook departure engine.
//!
//! This crate stores tours, departures, bookings and booking audit events in
//! `SQLite` through Diesel, and provides the transaction primitive every engine
//! operation runs inside.
//!
//! ## Concurrency
//!
//! Operations run in `BEGIN IMMEDIATE` transactions. Every departure write
//! is conditioned on the version that was read; a write that matches no row,
//! or a busy/locked database, is a conflict. A conflicting transaction is
//! rolled back and retried with exponential backoff and jitter, up to the
//! configured number of attempts, after which
//! `PersistenceError::ContentionExceeded` is returned.
//!
//! Several handles may be opened on the same database file from different
//! threads. The busy timeout is kept short so that lock waits surface as
//! conflicts in the retry loop.
//!
//! ## Testing
//!
//! - `new_in_memory()` gives every call its own shared-cache in-memory database
//! - File databases run in WAL mode

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, warn};
use tourbook_audit::BookingEvent;
use tourbook_domain::{Booking, BookingId, Departure, DepartureDate, DepartureId, Tour, TourId};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod retry;
mod store;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use retry::RetryPolicy;
pub use store::StoreTx;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Connection settings for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// How conflicting transactions are retried.
    pub retry: RetryPolicy,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            busy_timeout: Duration::from_millis(50),
        }
    }
}

/// Persistence adapter for tours, departures and bookings.
pub struct Persistence {
    conn: SqliteConnection,
    retry: RetryPolicy,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        Self::new_in_memory_with_options(StoreOptions::default())
    }

    /// Creates an in-memory adapter with explicit connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory_with_options(options: StoreOptions) -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_tourbook_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection =
            backend::sqlite::initialize_database(&shared_memory_url, busy_timeout_ms(&options))?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            retry: options.retry,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        Self::new_with_file_and_options(path, StoreOptions::default())
    }

    /// Creates a file-based adapter with explicit connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file_and_options<P: AsRef<Path>>(
        path: P,
        options: StoreOptions,
    ) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection =
            backend::sqlite::initialize_database(path_str, busy_timeout_ms(&options))?;

        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            retry: options.retry,
        })
    }

    /// Returns the retry policy transactions run under.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Runs `operation` in an immediate transaction, retrying on conflict.
    ///
    /// The closure may run more than once. It must derive everything it
    /// writes from what it reads through the given [`StoreTx`].
    ///
    /// # Arguments
    ///
    /// * `name` - Operation name for logging
    /// * `operation` - The work to do inside the transaction
    ///
    /// # Errors
    ///
    /// Returns the closure's error if it is not a conflict, and
    /// `PersistenceError::ContentionExceeded` once every attempt conflicted.
    pub fn transaction<T, F>(&mut self, name: &str, mut operation: F) -> Result<T, PersistenceError>
    where
        F: FnMut(&mut StoreTx<'_>) -> Result<T, PersistenceError>,
    {
        let max_attempts: u32 = self.retry.max_attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let now: OffsetDateTime = OffsetDateTime::now_utc();

            let result: Result<T, PersistenceError> = self
                .conn
                .immediate_transaction(|conn| operation(&mut StoreTx::new(conn, now)));

            match result {
                Err(err) if err.is_conflict() => {
                    if attempt >= max_attempts {
                        warn!(operation = name, attempts = attempt, error = %err, "Transaction contention exceeded");
                        return Err(PersistenceError::ContentionExceeded { attempts: attempt });
                    }
                    let backoff: Duration = self.retry.jittered_backoff(attempt);
                    warn!(
                        operation = name,
                        attempt,
                        backoff_us = u64::try_from(backoff.as_micros()).unwrap_or(u64::MAX),
                        error = %err,
                        "Transaction conflicted, retrying"
                    );
                    std::thread::sleep(backoff);
                }
                other => {
                    debug!(operation = name, attempt, ok = other.is_ok(), "Transaction finished");
                    return other;
                }
            }
        }
    }

    /// Inserts or replaces a tour and its pricing tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_tour(&mut self, tour: &Tour) -> Result<(), PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::tours::upsert_tour(conn, tour))
    }

    /// Loads a tour and its pricing tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the tour does not exist or the query fails.
    pub fn get_tour(&mut self, tour_id: TourId) -> Result<Tour, PersistenceError> {
        queries::tours::get_tour(&mut self.conn, tour_id)
    }

    /// Reads the current snapshot of a departure.
    ///
    /// # Errors
    ///
    /// Returns an error if the departure does not exist or the query fails.
    pub fn get_departure(&mut self, departure_id: DepartureId) -> Result<Departure, PersistenceError> {
        queries::departures::get_departure(&mut self.conn, departure_id)
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
        queries::departures::list_departures(&mut self.conn, tour_id, date)
    }

    /// Reads a booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist or the query fails.
    pub fn get_booking(&mut self, booking_id: BookingId) -> Result<Booking, PersistenceError> {
        queries::bookings::get_booking(&mut self.conn, booking_id)
    }

    /// Lists every booking on a departure, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings(&mut self, departure_id: DepartureId) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings(&mut self.conn, departure_id)
    }

    /// Loads the audit history of a booking, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist or the query fails.
    pub fn booking_history(&mut self, booking_id: BookingId) -> Result<Vec<BookingEvent>, PersistenceError> {
        queries::bookings::get_booking(&mut self.conn, booking_id)?;
        queries::bookings::booking_history(&mut self.conn, booking_id)
    }
}

fn busy_timeout_ms(options: &StoreOptions) -> u64 {
    u64::try_from(options.busy_timeout.as_millis()).unwrap_or(u64::MAX)
}
