// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;
use tourbook_domain::Tour;

use crate::data_models::{NewPricingTierRow, money_to_db, pax_to_db};
use crate::diesel_schema::{pricing_tiers, tours};
use crate::error::PersistenceError;

/// Inserts or replaces a tour and its pricing tiers.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_tour(conn: &mut SqliteConnection, tour: &Tour) -> Result<(), PersistenceError> {
    let is_active: i32 = i32::from(tour.is_active);

    diesel::insert_into(tours::table)
        .values((
            tours::tour_id.eq(tour.tour_id.value()),
            tours::name.eq(&tour.name),
            tours::is_active.eq(is_active),
        ))
        .on_conflict(tours::tour_id)
        .do_update()
        .set((tours::name.eq(&tour.name), tours::is_active.eq(is_active)))
        .execute(conn)?;

    diesel::delete(pricing_tiers::table.filter(pricing_tiers::tour_id.eq(tour.tour_id.value())))
        .execute(conn)?;

    let rows: Vec<NewPricingTierRow> = tour
        .price_table
        .tiers()
        .iter()
        .map(|tier| {
            Ok(NewPricingTierRow {
                tour_id: tour.tour_id.value(),
                min_pax: pax_to_db(tier.min_pax, "pricing_tiers.min_pax")?,
                max_pax: pax_to_db(tier.max_pax, "pricing_tiers.max_pax")?,
                unit_price: money_to_db(tier.unit_price, "pricing_tiers.unit_price")?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    diesel::insert_into(pricing_tiers::table)
        .values(&rows)
        .execute(conn)?;

    info!(
        tour_id = tour.tour_id.value(),
        tiers = rows.len(),
        is_active = tour.is_active,
        "Upserted tour"
    );

    Ok(())
}
