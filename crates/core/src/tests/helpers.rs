// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CapacityLimits, ChangeContext};
use time::macros::{date, datetime};
use tourbook_audit::Actor;
use tourbook_domain::{
    Booking, BookingId, BookingStatus, Customer, Departure, DepartureDate, DepartureId,
    DepartureStatus, DepartureType, Money, PriceTable, PricingTier, Tour, TourId,
};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("ops-1"), String::from("admin"))
}

pub fn create_test_context() -> ChangeContext {
    ChangeContext::new(
        datetime!(2026-02-01 09:30 UTC),
        create_test_actor(),
        Some(String::from("test")),
    )
}

pub const fn create_test_limits() -> CapacityLimits {
    CapacityLimits::new(10, 20)
}

/// 1-3 pax at 100.00, 4-8 at 85.00, 9-12 at 70.00.
pub fn create_test_tour() -> Tour {
    let table: PriceTable = PriceTable::new(vec![
        PricingTier::new(1, 3, Money::from_minor(10_000)),
        PricingTier::new(4, 8, Money::from_minor(8_500)),
        PricingTier::new(9, 12, Money::from_minor(7_000)),
    ])
    .unwrap();
    Tour::new(TourId::new(1), "Old Town Walk", table, true)
}

pub fn create_test_departure(
    id: i64,
    departure_type: DepartureType,
    max_pax: u32,
    current_pax: u32,
) -> Departure {
    Departure {
        departure_id: DepartureId::new(id),
        tour_id: TourId::new(1),
        date: DepartureDate::new(date!(2026 - 03 - 10)),
        departure_type,
        max_pax,
        current_pax,
        status: DepartureStatus::for_capacity(current_pax, max_pax),
        version: 1,
        created_at: datetime!(2026-01-01 00:00 UTC),
        updated_at: datetime!(2026-01-01 00:00 UTC),
    }
}

pub fn create_test_booking(id: i64, departure: &Departure, pax: u32, email: &str) -> Booking {
    let original_price: Money = create_test_tour().quote(pax).unwrap();
    Booking {
        booking_id: BookingId::new(id),
        departure_id: departure.departure_id,
        tour_id: departure.tour_id,
        lineage_id: BookingId::new(id),
        pax,
        customer: Customer::new("Test Customer", email, None),
        status: BookingStatus::Pending,
        booking_type: departure.departure_type,
        original_price,
        discount: Money::ZERO,
        final_price: original_price,
        moved_from: None,
        moved_to: None,
        created_at: datetime!(2026-01-15 12:00 UTC),
        updated_at: datetime!(2026-01-15 12:00 UTC),
    }
}
