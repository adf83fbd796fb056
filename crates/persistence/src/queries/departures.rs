// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;
use tourbook_domain::{
    Departure, DepartureDate, DepartureId, DepartureStatus, DepartureType, TourId,
};

use crate::data_models::{DepartureRow, pax_to_db};
use crate::diesel_schema::departures;
use crate::error::PersistenceError;

/// Reads the current snapshot of a departure.
///
/// # Errors
///
/// Returns `PersistenceError::DepartureNotFound` if no such departure exists.
pub fn get_departure(
    conn: &mut SqliteConnection,
    departure_id: DepartureId,
) -> Result<Departure, PersistenceError> {
    departures::table
        .filter(departures::departure_id.eq(departure_id.value()))
        .select(DepartureRow::as_select())
        .first::<DepartureRow>(conn)
        .optional()?
        .ok_or(PersistenceError::DepartureNotFound(departure_id))?
        .into_domain()
}

/// Finds the open public departure a party of `pax` can join.
///
/// Among open public departures of the tour on that date with at least
/// `pax` free seats, the one with the smallest id wins.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_joinable_departure(
    conn: &mut SqliteConnection,
    tour_id: TourId,
    date: DepartureDate,
    pax: u32,
) -> Result<Option<Departure>, PersistenceError> {
    let pax_value: i32 = pax_to_db(pax, "pax")?;

    let row: Option<DepartureRow> = departures::table
        .filter(departures::tour_id.eq(tour_id.value()))
        .filter(departures::departure_date.eq(date.to_string()))
        .filter(departures::departure_type.eq(DepartureType::Public.as_str()))
        .filter(departures::status.eq(DepartureStatus::Open.as_str()))
        .filter(departures::max_pax.ge(departures::current_pax + pax_value))
        .order(departures::departure_id.asc())
        .select(DepartureRow::as_select())
        .first::<DepartureRow>(conn)
        .optional()?;

    debug!(
        tour_id = tour_id.value(),
        %date,
        pax,
        found = row.as_ref().map(|r| r.departure_id),
        "Searched for joinable departure"
    );

    row.map(DepartureRow::into_domain).transpose()
}

/// Lists the departures of a tour, optionally restricted to one date.
///
/// Ordered by date, then id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_departures(
    conn: &mut SqliteConnection,
    tour_id: TourId,
    date: Option<DepartureDate>,
) -> Result<Vec<Departure>, PersistenceError> {
    let mut query = departures::table
        .filter(departures::tour_id.eq(tour_id.value()))
        .into_boxed();

    if let Some(date) = date {
        query = query.filter(departures::departure_date.eq(date.to_string()));
    }

    query
        .order((departures::departure_date.asc(), departures::departure_id.asc()))
        .select(DepartureRow::as_select())
        .load::<DepartureRow>(conn)?
        .into_iter()
        .map(DepartureRow::into_domain)
        .collect()
}
