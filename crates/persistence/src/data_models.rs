// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversion to domain values.
//!
//! Stored integers are signed; domain counts are unsigned. Every conversion
//! goes through `num_traits::ToPrimitive` and reports a reconstruction error
//! instead of truncating.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tourbook_domain::{
    Booking, BookingId, BookingStatus, Customer, Departure, DepartureDate, DepartureId,
    DepartureStatus, DepartureType, DomainError, Money, PricingTier, TourId,
};

use crate::diesel_schema::{booking_events, bookings, departures, pricing_tiers, tours};
use crate::error::PersistenceError;

/// Diesel Queryable struct for tour rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = tours)]
pub struct TourRow {
    pub tour_id: i64,
    pub name: String,
    pub is_active: i32,
}

/// Diesel Queryable struct for pricing tier rows.
#[allow(dead_code)]
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = pricing_tiers)]
pub struct PricingTierRow {
    pub tier_id: i64,
    pub tour_id: i64,
    pub min_pax: i32,
    pub max_pax: i32,
    pub unit_price: i64,
}

/// Diesel Insertable struct for pricing tiers.
#[derive(Debug, Insertable)]
#[diesel(table_name = pricing_tiers)]
pub struct NewPricingTierRow {
    pub tour_id: i64,
    pub min_pax: i32,
    pub max_pax: i32,
    pub unit_price: i64,
}

/// Diesel Queryable struct for departure rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = departures)]
pub struct DepartureRow {
    pub departure_id: i64,
    pub tour_id: i64,
    pub departure_date: String,
    pub departure_type: String,
    pub max_pax: i32,
    pub current_pax: i32,
    pub status: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Insertable struct for departures.
#[derive(Debug, Insertable)]
#[diesel(table_name = departures)]
pub struct NewDepartureRow {
    pub tour_id: i64,
    pub departure_date: String,
    pub departure_type: String,
    pub max_pax: i32,
    pub current_pax: i32,
    pub status: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Queryable struct for booking rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub struct BookingRow {
    pub booking_id: i64,
    pub departure_id: i64,
    pub tour_id: i64,
    pub lineage_id: Option<i64>,
    pub pax: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub status: String,
    pub booking_type: String,
    pub original_price: i64,
    pub discount: i64,
    pub final_price: i64,
    pub moved_from: Option<i64>,
    pub moved_to: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Insertable struct for bookings.
#[derive(Debug, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub departure_id: i64,
    pub tour_id: i64,
    pub lineage_id: Option<i64>,
    pub pax: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub status: String,
    pub booking_type: String,
    pub original_price: i64,
    pub discount: i64,
    pub final_price: i64,
    pub moved_from: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Diesel Queryable struct for booking event rows.
#[allow(dead_code)]
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = booking_events)]
pub struct BookingEventRow {
    pub event_id: i64,
    pub booking_id: i64,
    pub sequence: i32,
    pub kind: String,
    pub recorded_at: String,
    pub event_json: String,
}

/// Diesel Insertable struct for booking events.
#[derive(Debug, Insertable)]
#[diesel(table_name = booking_events)]
pub struct NewBookingEventRow {
    pub booking_id: i64,
    pub sequence: i32,
    pub kind: String,
    pub recorded_at: String,
    pub event_json: String,
}

impl PricingTierRow {
    /// Converts the row into a domain pricing tier.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value is out of range.
    pub fn into_domain(self) -> Result<PricingTier, PersistenceError> {
        Ok(PricingTier::new(
            to_u32(self.min_pax, "pricing_tiers.min_pax")?,
            to_u32(self.max_pax, "pricing_tiers.max_pax")?,
            to_money(self.unit_price, "pricing_tiers.unit_price")?,
        ))
    }
}

impl DepartureRow {
    /// Converts the row into a domain departure snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value cannot be parsed.
    pub fn into_domain(self) -> Result<Departure, PersistenceError> {
        Ok(Departure {
            departure_id: DepartureId::new(self.departure_id),
            tour_id: TourId::new(self.tour_id),
            date: DepartureDate::from_storage(&self.departure_date).map_err(reconstruction)?,
            departure_type: DepartureType::from_str(&self.departure_type)
                .map_err(reconstruction)?,
            max_pax: to_u32(self.max_pax, "departures.max_pax")?,
            current_pax: to_u32(self.current_pax, "departures.current_pax")?,
            status: DepartureStatus::from_str(&self.status).map_err(reconstruction)?,
            version: self.version,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl BookingRow {
    /// Converts the row into a domain booking.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value cannot be parsed.
    pub fn into_domain(self) -> Result<Booking, PersistenceError> {
        Ok(Booking {
            booking_id: BookingId::new(self.booking_id),
            departure_id: DepartureId::new(self.departure_id),
            tour_id: TourId::new(self.tour_id),
            lineage_id: BookingId::new(self.lineage_id.unwrap_or(self.booking_id)),
            pax: to_u32(self.pax, "bookings.pax")?,
            customer: Customer {
                name: self.customer_name,
                email: self.customer_email,
                phone: self.customer_phone,
            },
            status: BookingStatus::from_str(&self.status).map_err(reconstruction)?,
            booking_type: DepartureType::from_str(&self.booking_type).map_err(reconstruction)?,
            original_price: to_money(self.original_price, "bookings.original_price")?,
            discount: to_money(self.discount, "bookings.discount")?,
            final_price: to_money(self.final_price, "bookings.final_price")?,
            moved_from: self.moved_from.map(BookingId::new),
            moved_to: self.moved_to.map(BookingId::new),
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted as RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("Failed to format {at}: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("Failed to parse timestamp '{value}': {e}"))
    })
}

/// Converts a domain count into its stored form.
///
/// # Errors
///
/// Returns an error if the value does not fit the column.
pub fn pax_to_db(value: u32, column: &str) -> Result<i32, PersistenceError> {
    value.to_i32().ok_or_else(|| {
        PersistenceError::SerializationError(format!("{column} value out of range: {value}"))
    })
}

/// Converts an amount of money into its stored form.
///
/// # Errors
///
/// Returns an error if the value does not fit the column.
pub fn money_to_db(value: Money, column: &str) -> Result<i64, PersistenceError> {
    value.minor_units().to_i64().ok_or_else(|| {
        PersistenceError::SerializationError(format!("{column} value out of range: {value}"))
    })
}

fn reconstruction(err: DomainError) -> PersistenceError {
    PersistenceError::ReconstructionError(err.to_string())
}

fn to_u32(value: i32, column: &str) -> Result<u32, PersistenceError> {
    value.to_u32().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{column} value out of range: {value}"))
    })
}

fn to_money(value: i64, column: &str) -> Result<Money, PersistenceError> {
    value.to_u64().map(Money::from_minor).ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("{column} value out of range: {value}"))
    })
}
