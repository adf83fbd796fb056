// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query modules.
//!
//! - `tours`: Tour catalog and pricing tiers
//! - `departures`: Departure aggregates and joinable-departure search
//! - `bookings`: Booking records and their audit history

pub mod bookings;
pub mod departures;
pub mod tours;
