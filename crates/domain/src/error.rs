// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::TourId;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Party size must be at least one.
    InvalidPax {
        /// The rejected party size.
        pax: u32,
    },
    /// A departure capacity must be at least one.
    InvalidCapacity {
        /// The rejected capacity.
        max_pax: u32,
    },
    /// A pricing tier table is malformed.
    InvalidTierTable {
        /// Description of the violated rule.
        reason: String,
    },
    /// No pricing tier covers the requested party size.
    NoPricingTier {
        /// The tour whose tier table was consulted.
        tour_id: TourId,
        /// The party size that fell outside every tier.
        pax: u32,
    },
    /// A price computation overflowed.
    PriceOverflow {
        /// Description of the computation.
        operation: String,
    },
    /// Customer record is incomplete.
    InvalidCustomer(String),
    /// Departure type string is not recognized.
    InvalidDepartureType(String),
    /// Departure status string is not recognized.
    InvalidDepartureStatus(String),
    /// Booking status string is not recognized.
    InvalidBookingStatus(String),
    /// Timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// Failed to parse a departure date.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPax { pax } => {
                write!(f, "Invalid party size: {pax}. Must be at least 1")
            }
            Self::InvalidCapacity { max_pax } => {
                write!(f, "Invalid departure capacity: {max_pax}. Must be at least 1")
            }
            Self::InvalidTierTable { reason } => write!(f, "Invalid pricing tiers: {reason}"),
            Self::NoPricingTier { tour_id, pax } => {
                write!(f, "No pricing tier of tour {tour_id} covers {pax} pax")
            }
            Self::PriceOverflow { operation } => {
                write!(f, "Price arithmetic overflow while {operation}")
            }
            Self::InvalidCustomer(msg) => write!(f, "Invalid customer: {msg}"),
            Self::InvalidDepartureType(s) => write!(f, "Invalid departure type: {s}"),
            Self::InvalidDepartureStatus(s) => write!(f, "Invalid departure status: {s}"),
            Self::InvalidBookingStatus(s) => write!(f, "Invalid booking status: {s}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
