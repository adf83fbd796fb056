// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tourbook_domain::{PriceTable, PricingTier, Tour, TourId};

use crate::data_models::{PricingTierRow, TourRow};
use crate::diesel_schema::{pricing_tiers, tours};
use crate::error::PersistenceError;

/// Loads a tour and its pricing tiers.
///
/// # Errors
///
/// Returns `PersistenceError::TourNotFound` if no such tour exists, or a
/// reconstruction error if its stored tiers do not form a valid table.
pub fn get_tour(conn: &mut SqliteConnection, tour_id: TourId) -> Result<Tour, PersistenceError> {
    let row: TourRow = tours::table
        .filter(tours::tour_id.eq(tour_id.value()))
        .select(TourRow::as_select())
        .first::<TourRow>(conn)
        .optional()?
        .ok_or(PersistenceError::TourNotFound(tour_id))?;

    let tiers: Vec<PricingTier> = pricing_tiers::table
        .filter(pricing_tiers::tour_id.eq(tour_id.value()))
        .order(pricing_tiers::min_pax.asc())
        .select(PricingTierRow::as_select())
        .load::<PricingTierRow>(conn)?
        .into_iter()
        .map(PricingTierRow::into_domain)
        .collect::<Result<_, _>>()?;

    let price_table: PriceTable = PriceTable::new(tiers).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Tour {tour_id} has invalid tiers: {e}"))
    })?;

    Ok(Tour::new(
        tour_id,
        &row.name,
        price_table,
        row.is_active != 0,
    ))
}
