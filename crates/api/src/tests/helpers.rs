// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use time::macros::date;
use tourbook_audit::Actor;
use tourbook_domain::{
    Customer, DepartureDate, DepartureType, Money, PriceTable, PricingTier, Tour, TourId,
};
use tracing_subscriber::EnvFilter;

use crate::{Engine, EngineConfig, JoinRequest, JoinResponse};

/// Installs a test-writer subscriber once per process.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("agent-7"), String::from("operator"))
}

pub fn create_test_date() -> DepartureDate {
    DepartureDate::new(date!(2026 - 03 - 10))
}

pub fn create_next_day() -> DepartureDate {
    DepartureDate::new(date!(2026 - 03 - 11))
}

/// 1-3 pax at 100.00, 4-8 at 85.00, 9-12 at 70.00.
pub fn create_test_tour(tour_id: i64) -> Tour {
    let table: PriceTable = PriceTable::new(vec![
        PricingTier::new(1, 3, Money::from_minor(10_000)),
        PricingTier::new(4, 8, Money::from_minor(8_500)),
        PricingTier::new(9, 12, Money::from_minor(7_000)),
    ])
    .unwrap();
    Tour::new(TourId::new(tour_id), "Old Town Walk", table, true)
}

/// Public departures seat 8, private ones 10.
pub fn create_test_config() -> EngineConfig {
    EngineConfig {
        default_public_max_pax: 8,
        ..EngineConfig::default()
    }
}

pub fn create_test_engine() -> Engine {
    init_test_tracing();
    let mut engine: Engine = Engine::open_in_memory(create_test_config()).unwrap();
    engine.upsert_tour(&create_test_tour(1)).unwrap();
    engine
}

pub fn create_test_customer(email: &str) -> Customer {
    Customer::new("Test Customer", email, Some(String::from("+1 555 0100")))
}

pub fn create_join_request(departure_type: DepartureType, pax: u32, email: &str) -> JoinRequest {
    JoinRequest::new(
        TourId::new(1),
        create_test_date(),
        departure_type,
        pax,
        create_test_customer(email),
    )
}

/// Seats a public party on tour 1 on the test date.
pub fn join_public(engine: &mut Engine, pax: u32, email: &str) -> JoinResponse {
    engine
        .create_or_join_departure(
            &create_join_request(DepartureType::Public, pax, email),
            &create_test_actor(),
        )
        .unwrap()
}

/// Seats a private party on tour 1 on the test date.
pub fn join_private(engine: &mut Engine, pax: u32, email: &str) -> JoinResponse {
    engine
        .create_or_join_departure(
            &create_join_request(DepartureType::Private, pax, email),
            &create_test_actor(),
        )
        .unwrap()
}
