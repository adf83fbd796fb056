// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};
use tourbook_domain::{
    Departure, DepartureId, DepartureStatus, NewDeparture, validate_capacity,
};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewDepartureRow, format_timestamp, pax_to_db};
use crate::diesel_schema::departures;
use crate::error::PersistenceError;
use crate::queries::departures::get_departure;

/// Inserts a new, empty departure.
///
/// # Errors
///
/// Returns an error if the capacity is zero or the insert fails.
pub fn insert_departure(
    conn: &mut SqliteConnection,
    departure: &NewDeparture,
    at: OffsetDateTime,
) -> Result<Departure, PersistenceError> {
    validate_capacity(departure.max_pax)?;

    let now: String = format_timestamp(at)?;
    let row = NewDepartureRow {
        tour_id: departure.tour_id.value(),
        departure_date: departure.date.to_string(),
        departure_type: departure.departure_type.as_str().to_string(),
        max_pax: pax_to_db(departure.max_pax, "departures.max_pax")?,
        current_pax: 0,
        status: DepartureStatus::Open.as_str().to_string(),
        version: 1,
        created_at: now.clone(),
        updated_at: now,
    };

    diesel::insert_into(departures::table)
        .values(&row)
        .execute(conn)?;

    let departure_id: DepartureId = DepartureId::new(get_last_insert_rowid(conn)?);

    info!(
        departure_id = departure_id.value(),
        tour_id = departure.tour_id.value(),
        date = %departure.date,
        departure_type = departure.departure_type.as_str(),
        max_pax = departure.max_pax,
        "Created departure"
    );

    get_departure(conn, departure_id)
}

/// Writes a departure snapshot if the stored row is still at `expected_version`.
///
/// The stored version becomes `expected_version + 1`.
///
/// # Errors
///
/// Returns `PersistenceError::Conflict` if the row changed since it was read,
/// or another error if the write fails.
pub fn write_departure(
    conn: &mut SqliteConnection,
    next: &Departure,
    expected_version: i64,
    at: OffsetDateTime,
) -> Result<Departure, PersistenceError> {
    let updated_at: String = format_timestamp(at)?;

    let rows: usize = diesel::update(
        departures::table
            .filter(departures::departure_id.eq(next.departure_id.value()))
            .filter(departures::version.eq(expected_version)),
    )
    .set((
        departures::departure_type.eq(next.departure_type.as_str()),
        departures::max_pax.eq(pax_to_db(next.max_pax, "departures.max_pax")?),
        departures::current_pax.eq(pax_to_db(next.current_pax, "departures.current_pax")?),
        departures::status.eq(next.status.as_str()),
        departures::version.eq(expected_version + 1),
        departures::updated_at.eq(&updated_at),
    ))
    .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::Conflict(format!(
            "departure {} is no longer at version {expected_version}",
            next.departure_id
        )));
    }

    debug!(
        departure_id = next.departure_id.value(),
        current_pax = next.current_pax,
        max_pax = next.max_pax,
        status = next.status.as_str(),
        version = expected_version + 1,
        "Wrote departure snapshot"
    );

    let mut stored: Departure = next.clone();
    stored.version = expected_version + 1;
    stored.updated_at = at;
    Ok(stored)
}
