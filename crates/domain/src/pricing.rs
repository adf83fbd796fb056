// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tiered pricing by party size.
//!
//! A tour prices a booking by looking up the tier whose `[min_pax, max_pax]`
//! band contains the party size. The unit price of that tier applies to every
//! participant.
//!
//! ## Invariants
//!
//! - A table has at least one tier
//! - The first tier starts at 1 pax
//! - Each tier starts exactly one past the previous tier's `max_pax`
//! - Every tier has `min_pax <= max_pax`

use crate::error::DomainError;
use crate::types::{Money, TourId};
use serde::{Deserialize, Serialize};

/// A party-size band mapped to a per-person price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    /// Smallest party size covered (inclusive).
    pub min_pax: u32,
    /// Largest party size covered (inclusive).
    pub max_pax: u32,
    /// Price per participant.
    pub unit_price: Money,
}

impl PricingTier {
    /// Creates a tier.
    #[must_use]
    pub const fn new(min_pax: u32, max_pax: u32, unit_price: Money) -> Self {
        Self {
            min_pax,
            max_pax,
            unit_price,
        }
    }

    /// Returns whether this tier covers a party size.
    #[must_use]
    pub const fn covers(&self, pax: u32) -> bool {
        pax >= self.min_pax && pax <= self.max_pax
    }
}

/// A validated, contiguous tier table.
///
/// Serializes as a plain list of tiers and is validated again on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricingTier>", into = "Vec<PricingTier>")]
pub struct PriceTable {
    tiers: Vec<PricingTier>,
}

impl PriceTable {
    /// Validates and builds a tier table.
    ///
    /// Tiers may be supplied in any order; they are sorted by `min_pax`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTierTable` if the tiers are empty,
    /// do not start at 1, overlap, or leave a gap.
    pub fn new(mut tiers: Vec<PricingTier>) -> Result<Self, DomainError> {
        if tiers.is_empty() {
            return Err(DomainError::InvalidTierTable {
                reason: String::from("at least one tier is required"),
            });
        }

        tiers.sort_by_key(|tier| tier.min_pax);

        let mut expected_min: u32 = 1;
        for tier in &tiers {
            if tier.min_pax > tier.max_pax {
                return Err(DomainError::InvalidTierTable {
                    reason: format!(
                        "tier [{}, {}] has min_pax greater than max_pax",
                        tier.min_pax, tier.max_pax
                    ),
                });
            }
            if tier.min_pax != expected_min {
                return Err(DomainError::InvalidTierTable {
                    reason: format!(
                        "tier [{}, {}] must start at {expected_min}",
                        tier.min_pax, tier.max_pax
                    ),
                });
            }
            expected_min = tier
                .max_pax
                .checked_add(1)
                .ok_or_else(|| DomainError::InvalidTierTable {
                    reason: String::from("tier upper bound overflows"),
                })?;
        }

        Ok(Self { tiers })
    }

    /// Returns the tiers in ascending order.
    #[must_use]
    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    /// Returns the largest party size any tier covers.
    #[must_use]
    pub fn max_covered_pax(&self) -> u32 {
        self.tiers.last().map_or(0, |tier| tier.max_pax)
    }

    /// Looks up the unit price for a party size.
    #[must_use]
    pub fn unit_price(&self, pax: u32) -> Option<Money> {
        self.tiers
            .iter()
            .find(|tier| tier.covers(pax))
            .map(|tier| tier.unit_price)
    }
}

impl TryFrom<Vec<PricingTier>> for PriceTable {
    type Error = DomainError;

    fn try_from(tiers: Vec<PricingTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<PriceTable> for Vec<PricingTier> {
    fn from(table: PriceTable) -> Self {
        table.tiers
    }
}

/// A read-only catalog record of a tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    /// Catalog identifier.
    pub tour_id: TourId,
    /// Display name.
    pub name: String,
    /// Party-size pricing.
    pub price_table: PriceTable,
    /// Whether new bookings may be taken.
    pub is_active: bool,
}

impl Tour {
    /// Creates a tour record.
    #[must_use]
    pub fn new(tour_id: TourId, name: &str, price_table: PriceTable, is_active: bool) -> Self {
        Self {
            tour_id,
            name: name.to_string(),
            price_table,
            is_active,
        }
    }

    /// Resolves the per-person price for a party size.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoPricingTier` if no tier covers `pax`.
    pub fn unit_price(&self, pax: u32) -> Result<Money, DomainError> {
        self.price_table
            .unit_price(pax)
            .ok_or(DomainError::NoPricingTier {
                tour_id: self.tour_id,
                pax,
            })
    }

    /// Prices a whole party: unit price times party size.
    ///
    /// # Errors
    ///
    /// Returns an error if no tier covers `pax` or the total overflows.
    pub fn quote(&self, pax: u32) -> Result<Money, DomainError> {
        self.unit_price(pax)?.times(pax)
    }
}
