// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `tours`: Catalog sync
//! - `departures`: Departure inserts and version-checked snapshot writes
//! - `bookings`: Booking inserts, updates, and audit event appends
//!
//! Departure writes are conditioned on the version that was read. A write
//! that matches no row is reported as `PersistenceError::Conflict`.

pub mod bookings;
pub mod departures;
pub mod tours;
