// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod booking_tests;

use std::time::Duration;
use time::macros::date;
use tourbook_audit::{Actor, BookingChange, BookingEvent};
use tourbook_domain::{
    Customer, DepartureDate, DepartureId, DepartureType, Money, NewBooking, NewDeparture,
    PriceTable, PricingTier, Tour, TourId,
};

use crate::{Persistence, RetryPolicy, StoreOptions};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("system"))
}

pub fn create_test_date() -> DepartureDate {
    DepartureDate::new(date!(2026 - 03 - 10))
}

/// 1-3 pax at 100.00, 4-8 at 85.00.
pub fn create_test_tour(tour_id: i64) -> Tour {
    let table: PriceTable = PriceTable::new(vec![
        PricingTier::new(1, 3, Money::from_minor(10_000)),
        PricingTier::new(4, 8, Money::from_minor(8_500)),
    ])
    .unwrap();
    Tour::new(TourId::new(tour_id), "Harbour Cruise", table, true)
}

pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.upsert_tour(&create_test_tour(1)).unwrap();
    persistence
}

/// Two attempts with sub-millisecond backoff.
pub fn create_impatient_persistence() -> Persistence {
    let options = StoreOptions {
        retry: RetryPolicy::new(2, Duration::from_micros(100), Duration::from_micros(200)),
        ..StoreOptions::default()
    };
    let mut persistence: Persistence = Persistence::new_in_memory_with_options(options).unwrap();
    persistence.upsert_tour(&create_test_tour(1)).unwrap();
    persistence
}

pub fn create_new_departure(departure_type: DepartureType, max_pax: u32) -> NewDeparture {
    NewDeparture::new(TourId::new(1), create_test_date(), departure_type, max_pax)
}

pub fn create_new_booking(departure_id: DepartureId, pax: u32, email: &str) -> NewBooking {
    let price: Money = create_test_tour(1).quote(pax).unwrap();
    NewBooking {
        departure_id,
        tour_id: TourId::new(1),
        lineage_id: None,
        pax,
        customer: Customer::new("Test Customer", email, None),
        status: tourbook_domain::BookingStatus::Pending,
        booking_type: DepartureType::Public,
        original_price: price,
        discount: Money::ZERO,
        moved_from: None,
    }
}

pub fn create_created_event(departure_id: DepartureId, pax: u32) -> BookingEvent {
    BookingEvent::new(
        time::OffsetDateTime::now_utc(),
        create_test_actor(),
        None,
        BookingChange::Created {
            departure_id,
            pax,
            booking_type: DepartureType::Public,
        },
    )
}
