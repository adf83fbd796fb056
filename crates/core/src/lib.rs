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

//! Transition rules of the Tourbook departure engine.
//!
//! This crate decides what every capacity or booking change does, given
//! the snapshots read inside a transaction. It performs no I/O.

mod capacity;
mod cascade;
mod error;
mod state;
mod transfer;

#[cfg(test)]
mod tests;

pub use capacity::{apply_capacity_delta, cancel_departure, reshape};
pub use cascade::{
    conversion_transition, ensure_active, ensure_on_departure, plan_cancellation,
    plan_conversion, plan_departure_cancellation, plan_discount, plan_pax_change, plan_status_change, quote_bookable,
};
pub use error::CoreError;
pub use state::{
    BookingTransition, CancellationPlan, CapacityLimits, ChangeContext, ConversionPlan,
    PaxChangePlan, StatusOutcome,
};
pub use transfer::{MoveLink, MoveTarget, link_move, move_changes, split_transition, validate_split};
