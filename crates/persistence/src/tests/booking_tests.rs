// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tourbook_audit::{BookingChange, BookingEvent};
use tourbook_domain::{
    Booking, BookingId, BookingStatus, Departure, DepartureType, Money, NewBooking,
};

use super::{
    create_created_event, create_new_booking, create_new_departure, create_test_actor,
    create_test_persistence,
};
use crate::{Persistence, PersistenceError};

fn seed_booking(persistence: &mut Persistence, pax: u32) -> Booking {
    persistence
        .transaction("seed", |tx| {
            let departure: Departure =
                tx.insert_departure(&create_new_departure(DepartureType::Public, 8))?;
            tx.apply_capacity_delta(departure.departure_id, i64::from(pax), None)?;
            tx.insert_booking(
                &create_new_booking(departure.departure_id, pax, "guest@example.com"),
                &create_created_event(departure.departure_id, pax),
            )
        })
        .unwrap()
}

#[test]
fn test_new_booking_roots_its_own_lineage() {
    let mut persistence: Persistence = create_test_persistence();

    let booking: Booking = seed_booking(&mut persistence, 2);

    assert_eq!(booking.lineage_id, booking.booking_id);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.original_price, Money::from_minor(20_000));
    assert_eq!(booking.final_price, Money::from_minor(20_000));
    assert_eq!(booking.moved_from, None);
}

#[test]
fn test_booking_with_lineage_keeps_it() {
    let mut persistence: Persistence = create_test_persistence();
    let root: Booking = seed_booking(&mut persistence, 2);

    let child: Booking = persistence
        .transaction("test", |tx| {
            let mut values: NewBooking =
                create_new_booking(root.departure_id, 2, "guest@example.com");
            values.lineage_id = Some(root.lineage_id);
            values.moved_from = Some(root.booking_id);
            tx.apply_capacity_delta(root.departure_id, 2, None)?;
            tx.insert_booking(&values, &create_created_event(root.departure_id, 2))
        })
        .unwrap();

    assert_eq!(child.lineage_id, root.booking_id);
    assert_eq!(child.moved_from, Some(root.booking_id));
    assert!(child.same_party(&root));
}

#[test]
fn test_history_starts_with_created_event() {
    let mut persistence: Persistence = create_test_persistence();
    let booking: Booking = seed_booking(&mut persistence, 3);

    let history: Vec<BookingEvent> = persistence.booking_history(booking.booking_id).unwrap();

    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].change,
        BookingChange::Created {
            departure_id: booking.departure_id,
            pax: 3,
            booking_type: DepartureType::Public,
        }
    );
}

#[test]
fn test_events_are_appended_in_order() {
    let mut persistence: Persistence = create_test_persistence();
    let booking: Booking = seed_booking(&mut persistence, 2);

    persistence
        .transaction("test", |tx| {
            let mut updated: Booking = booking.clone();
            updated.status = BookingStatus::Confirmed;
            tx.update_booking(&updated)?;
            tx.append_event(
                booking.booking_id,
                &BookingEvent::new(
                    tx.now(),
                    create_test_actor(),
                    Some(String::from("phoned in")),
                    BookingChange::StatusChange {
                        before: BookingStatus::Pending,
                        after: BookingStatus::Confirmed,
                    },
                ),
            )
        })
        .unwrap();

    let kinds: Vec<&str> = persistence
        .booking_history(booking.booking_id)
        .unwrap()
        .iter()
        .map(BookingEvent::kind)
        .collect();
    assert_eq!(kinds, vec!["Created", "StatusChange"]);
    assert_eq!(
        persistence.get_booking(booking.booking_id).unwrap().status,
        BookingStatus::Confirmed
    );
}

#[test]
fn test_active_pax_sum_excludes_cancelled() {
    let mut persistence: Persistence = create_test_persistence();
    let first: Booking = seed_booking(&mut persistence, 2);

    let sum: u32 = persistence
        .transaction("test", |tx| {
            tx.apply_capacity_delta(first.departure_id, 3, None)?;
            tx.insert_booking(
                &create_new_booking(first.departure_id, 3, "other@example.com"),
                &create_created_event(first.departure_id, 3),
            )?;
            let mut cancelled: Booking = first.clone();
            cancelled.status = BookingStatus::Cancelled;
            tx.update_booking(&cancelled)?;
            tx.apply_capacity_delta(first.departure_id, -2, None)?;
            tx.active_pax_sum(first.departure_id)
        })
        .unwrap();

    assert_eq!(sum, 3);
    assert_eq!(
        persistence.get_departure(first.departure_id).unwrap().current_pax,
        3
    );
    assert_eq!(persistence.list_bookings(first.departure_id).unwrap().len(), 2);
}

#[test]
fn test_booking_with_invalid_email_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();

    let result = persistence.transaction("test", |tx| {
        let departure: Departure =
            tx.insert_departure(&create_new_departure(DepartureType::Public, 8))?;
        tx.insert_booking(
            &create_new_booking(departure.departure_id, 2, "not-an-email"),
            &create_created_event(departure.departure_id, 2),
        )
    });

    assert!(matches!(result, Err(PersistenceError::Rule(_))));
}

#[test]
fn test_unknown_booking_history_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();

    assert_eq!(
        persistence.booking_history(BookingId::new(99)),
        Err(PersistenceError::BookingNotFound(BookingId::new(99)))
    );
}
