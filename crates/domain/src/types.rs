// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a canonical numeric identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the canonical numeric identifier.
            #[must_use]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id! {
    /// Canonical identifier of a tour in the catalog.
    TourId
}

numeric_id! {
    /// Canonical identifier of a departure.
    DepartureId
}

numeric_id! {
    /// Canonical identifier of a booking.
    BookingId
}

/// Visibility mode of a departure (and of the booking made against it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartureType {
    /// Shareable by independent bookings up to its capacity.
    Public,
    /// Exclusive to one booking party.
    Private,
}

impl DepartureType {
    /// Converts this type to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl FromStr for DepartureType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(DomainError::InvalidDepartureType(s.to_string())),
        }
    }
}

impl std::fmt::Display for DepartureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a departure.
///
/// `Open` and `Full` are derived from capacity. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepartureStatus {
    /// Has spare capacity.
    Open,
    /// `current_pax == max_pax`.
    Full,
    /// Irreversibly cancelled.
    Cancelled,
}

impl DepartureStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Full => "full",
            Self::Cancelled => "cancelled",
        }
    }

    /// Derives the capacity status for a non-cancelled departure.
    #[must_use]
    pub const fn for_capacity(current_pax: u32, max_pax: u32) -> Self {
        if current_pax >= max_pax {
            Self::Full
        } else {
            Self::Open
        }
    }
}

impl FromStr for DepartureStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "full" => Ok(Self::Full),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidDepartureStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for DepartureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a booking.
///
/// `Cancelled` is terminal: no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created, awaiting confirmation or payment.
    #[default]
    Pending,
    /// Confirmed by an operator.
    Confirmed,
    /// Paid in full.
    Paid,
    /// Cancelled.
    Cancelled,
}

impl BookingStatus {
    /// Converts this status to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether this booking still holds seats.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An amount of money in minor currency units (e.g. cents).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor(minor_units: u64) -> Self {
        Self(minor_units)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Multiplies a unit price by a party size.
    ///
    /// # Errors
    ///
    /// Returns an error if the product overflows.
    pub fn times(self, pax: u32) -> Result<Self, DomainError> {
        self.0
            .checked_mul(u64::from(pax))
            .map(Self)
            .ok_or_else(|| DomainError::PriceOverflow {
                operation: format!("multiplying {self} by {pax} pax"),
            })
    }

    /// Subtracts a discount, flooring at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// The customer a booking belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Full name.
    pub name: String,
    /// Contact email, normalized to lowercase.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
}

impl Customer {
    /// Creates a customer record.
    ///
    /// Email is trimmed and lowercased so the same customer compares equal
    /// regardless of how the address was typed.
    #[must_use]
    pub fn new(name: &str, email: &str, phone: Option<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            phone,
        }
    }
}
