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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod booking;
mod date;
mod departure;
mod error;
mod pricing;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use booking::{Booking, NewBooking};
pub use date::{DepartureDate, REFERENCE_HOUR};
pub use departure::{Departure, NewDeparture};
pub use error::DomainError;
pub use pricing::{PriceTable, PricingTier, Tour};
pub use types::{
    BookingId, BookingStatus, Customer, DepartureId, DepartureStatus, DepartureType, Money, TourId,
};
pub use validation::{validate_capacity, validate_customer, validate_pax};
