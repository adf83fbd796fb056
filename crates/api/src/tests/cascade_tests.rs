// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use tourbook_audit::{Actor, BookingChange};
use tourbook_domain::{
    Booking, BookingStatus, Departure, DepartureStatus, DepartureType, Money, TourId,
};

use super::helpers::{
    create_join_request, create_test_actor, create_test_date, create_test_engine, join_private,
    join_public,
};
use crate::{Engine, EngineError, InvariantReport, JoinRequest, JoinResponse};

#[test]
fn test_pax_change_across_tier_boundary_reprices() {
    let mut engine: Engine = create_test_engine();
    let joined: JoinResponse = join_public(&mut engine, 2, "a@example.com");

    let updated: Booking = engine
        .update_booking_pax(joined.booking.booking_id, 4, &create_test_actor())
        .unwrap();

    assert_eq!(updated.pax, 4);
    assert_eq!(updated.original_price, Money::from_minor(34_000));
    assert_eq!(updated.final_price, Money::from_minor(34_000));
    assert_eq!(
        engine.get_departure(joined.departure.departure_id).unwrap().current_pax,
        4
    );

    let history = engine.booking_history(updated.booking_id).unwrap();
    assert_eq!(
        history.last().unwrap().change,
        BookingChange::PaxChange {
            before_pax: 2,
            after_pax: 4,
            before_price: Money::from_minor(20_000),
            after_price: Money::from_minor(34_000),
        }
    );
}

#[test]
fn test_pax_change_over_capacity_changes_nothing() {
    let mut engine: Engine = create_test_engine();
    let a: JoinResponse = join_public(&mut engine, 2, "a@example.com");
    join_public(&mut engine, 5, "b@example.com");

    let err: EngineError = engine
        .update_booking_pax(a.booking.booking_id, 4, &create_test_actor())
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::CapacityExceeded {
            departure_id: a.departure.departure_id,
            requested: 2,
            current_pax: 7,
            max_pax: 8,
        }
    );
    assert_eq!(engine.get_booking(a.booking.booking_id).unwrap().pax, 2);
    assert_eq!(
        engine.get_departure(a.departure.departure_id).unwrap().current_pax,
        7
    );
    assert_eq!(engine.booking_history(a.booking.booking_id).unwrap().len(), 1);
}

#[test]
fn test_pax_decrease_releases_seats() {
    let mut engine: Engine = create_test_engine();
    let joined: JoinResponse = join_public(&mut engine, 5, "a@example.com");
    join_public(&mut engine, 3, "b@example.com");

    engine
        .update_booking_pax(joined.booking.booking_id, 1, &create_test_actor())
        .unwrap();

    let departure: Departure = engine.get_departure(joined.departure.departure_id).unwrap();
    assert_eq!(departure.current_pax, 4);
    assert_eq!(departure.status, DepartureStatus::Open);
}

#[test]
fn test_unchanged_pax_is_a_no_op() {
    let mut engine: Engine = create_test_engine();
    let joined: JoinResponse = join_public(&mut engine, 2, "a@example.com");

    let same: Booking = engine
        .update_booking_pax(joined.booking.booking_id, 2, &create_test_actor())
        .unwrap();

    assert_eq!(same.pax, 2);
    assert_eq!(same.original_price, joined.booking.original_price);
    assert_eq!(engine.booking_history(same.booking_id).unwrap().len(), 1);
}

#[test]
fn test_private_pax_change_is_bounded_by_ceiling() {
    let mut engine: Engine = create_test_engine();
    let joined: JoinResponse = join_private(&mut engine, 8, "a@example.com");

    let err: EngineError = engine
        .update_booking_pax(joined.booking.booking_id, 11, &create_test_actor())
        .unwrap_err();

    assert_eq!(err.code(), "CAPACITY_EXCEEDED");
}

#[test]
fn test_discount_sets_final_price_and_survives_pax_change() {
    let mut engine: Engine = create_test_engine();
    let actor: Actor = create_test_actor();
    let joined: JoinResponse = join_public(&mut engine, 2, "a@example.com");

    let discounted: Booking = engine
        .apply_discount(joined.booking.booking_id, Money::from_minor(5_000), &actor)
        .unwrap();
    assert_eq!(discounted.final_price, Money::from_minor(15_000));

    let resized: Booking = engine
        .update_booking_pax(joined.booking.booking_id, 3, &actor)
        .unwrap();
    assert_eq!(resized.discount, Money::from_minor(5_000));
    assert_eq!(resized.final_price, Money::from_minor(25_000));
}

#[test]
fn test_cancelling_public_booking_reopens_full_departure() {
    let mut engine: Engine = create_test_engine();
    let a: JoinResponse = join_public(&mut engine, 5, "a@example.com");
    let b: JoinResponse = join_public(&mut engine, 3, "b@example.com");
    assert_eq!(b.departure.status, DepartureStatus::Full);

    let cancelled: Booking = engine
        .cancel_booking(b.booking.booking_id, &create_test_actor(), Some("changed plans"))
        .unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    let departure: Departure = engine.get_departure(a.departure.departure_id).unwrap();
    assert_eq!(departure.status, DepartureStatus::Open);
    assert_eq!(departure.current_pax, 5);

    let history = engine.booking_history(b.booking.booking_id).unwrap();
    assert_eq!(history.last().unwrap().reason.as_deref(), Some("changed plans"));
}

#[test]
fn test_cancelling_last_public_booking_keeps_departure_open() {
    let mut engine: Engine = create_test_engine();
    let joined: JoinResponse = join_public(&mut engine, 2, "a@example.com");

    engine
        .cancel_booking(joined.booking.booking_id, &create_test_actor(), None)
        .unwrap();

    let departure: Departure = engine.get_departure(joined.departure.departure_id).unwrap();
    assert_eq!(departure.status, DepartureStatus::Open);
    assert_eq!(departure.current_pax, 0);
}

#[test]
fn test_cancelling_private_booking_cancels_departure() {
    let mut engine: Engine = create_test_engine();
    let joined: JoinResponse = join_private(&mut engine, 4, "a@example.com");

    engine
        .cancel_booking(joined.booking.booking_id, &create_test_actor(), None)
        .unwrap();

    let departure: Departure = engine.get_departure(joined.departure.departure_id).unwrap();
    assert_eq!(departure.status, DepartureStatus::Cancelled);
    assert_eq!(departure.current_pax, 0);

    let history = engine.booking_history(joined.booking.booking_id).unwrap();
    assert!(matches!(
        history.last().unwrap().change,
        BookingChange::Cancellation {
            departure_cancelled: true,
            ..
        }
    ));
}

#[test]
fn test_cancelling_twice_is_rejected() {
    let mut engine: Engine = create_test_engine();
    let actor: Actor = create_test_actor();
    let joined: JoinResponse = join_public(&mut engine, 2, "a@example.com");
    let booking_id = joined.booking.booking_id;

    engine.cancel_booking(booking_id, &actor, None).unwrap();
    let err: EngineError = engine.cancel_booking(booking_id, &actor, None).unwrap_err();

    assert_eq!(err, EngineError::AlreadyCancelled { booking_id });
    assert_eq!(
        engine.get_departure(joined.departure.departure_id).unwrap().current_pax,
        0
    );
}

#[test]
fn test_mutations_of_cancelled_booking_are_rejected() {
    let mut engine: Engine = create_test_engine();
    let actor: Actor = create_test_actor();
    let joined: JoinResponse = join_public(&mut engine, 2, "a@example.com");
    let booking_id = joined.booking.booking_id;
    engine.cancel_booking(booking_id, &actor, None).unwrap();

    assert_eq!(
        engine.update_booking_pax(booking_id, 3, &actor).unwrap_err().code(),
        "ALREADY_CANCELLED"
    );
    assert_eq!(
        engine
            .apply_discount(booking_id, Money::from_minor(100), &actor)
            .unwrap_err()
            .code(),
        "ALREADY_CANCELLED"
    );
    assert_eq!(
        engine
            .convert_booking_type(booking_id, DepartureType::Private, None, &actor)
            .unwrap_err()
            .code(),
        "ALREADY_CANCELLED"
    );
}

#[test]
fn test_status_walks_through_active_statuses() {
    let mut engine: Engine = create_test_engine();
    let actor: Actor = create_test_actor();
    let joined: JoinResponse = join_public(&mut engine, 2, "a@example.com");
    let booking_id = joined.booking.booking_id;

    engine
        .update_booking_status(booking_id, BookingStatus::Confirmed, &actor)
        .unwrap();
    let paid: Booking = engine
        .update_booking_status(booking_id, BookingStatus::Paid, &actor)
        .unwrap();
    assert_eq!(paid.status, BookingStatus::Paid);

    // Same status leaves the history alone.
    engine
        .update_booking_status(booking_id, BookingStatus::Paid, &actor)
        .unwrap();
    let history = engine.booking_history(booking_id).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(
        history[2].change,
        BookingChange::StatusChange {
            before: BookingStatus::Confirmed,
            after: BookingStatus::Paid,
        }
    );
}

#[test]
fn test_status_cancelled_runs_cancellation_and_cannot_be_undone() {
    let mut engine: Engine = create_test_engine();
    let actor: Actor = create_test_actor();
    let joined: JoinResponse = join_private(&mut engine, 3, "a@example.com");
    let booking_id = joined.booking.booking_id;

    engine
        .update_booking_status(booking_id, BookingStatus::Cancelled, &actor)
        .unwrap();
    assert_eq!(
        engine.get_departure(joined.departure.departure_id).unwrap().status,
        DepartureStatus::Cancelled
    );

    let err: EngineError = engine
        .update_booking_status(booking_id, BookingStatus::Confirmed, &actor)
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::CannotReactivate {
            booking_id,
            requested: BookingStatus::Confirmed,
        }
    );
    assert_eq!(
        engine
            .update_booking_status(booking_id, BookingStatus::Cancelled, &actor)
            .unwrap_err()
            .code(),
        "ALREADY_CANCELLED"
    );
}

#[test]
fn test_sole_booking_converts_departure_in_place() {
    let mut engine: Engine = create_test_engine();
    let joined: JoinResponse = join_public(&mut engine, 4, "a@example.com");

    let converted: Booking = engine
        .convert_booking_type(
            joined.booking.booking_id,
            DepartureType::Private,
            None,
            &create_test_actor(),
        )
        .unwrap();

    assert_eq!(converted.booking_type, DepartureType::Private);
    assert_eq!(converted.departure_id, joined.departure.departure_id);

    let departure: Departure = engine.get_departure(joined.departure.departure_id).unwrap();
    assert_eq!(departure.departure_type, DepartureType::Private);
    assert_eq!(departure.max_pax, 10);
    assert_eq!(departure.current_pax, 4);
}

#[test]
fn test_shared_booking_is_detached_on_conversion() {
    let mut engine: Engine = create_test_engine();
    let a: JoinResponse = join_public(&mut engine, 2, "a@example.com");
    let b: JoinResponse = join_public(&mut engine, 3, "b@example.com");

    let converted: Booking = engine
        .convert_booking_type(
            b.booking.booking_id,
            DepartureType::Private,
            None,
            &create_test_actor(),
        )
        .unwrap();

    assert_ne!(converted.departure_id, a.departure.departure_id);

    let source: Departure = engine.get_departure(a.departure.departure_id).unwrap();
    assert_eq!(source.departure_type, DepartureType::Public);
    assert_eq!(source.current_pax, 2);

    let detached: Departure = engine.get_departure(converted.departure_id).unwrap();
    assert_eq!(detached.departure_type, DepartureType::Private);
    assert_eq!(detached.max_pax, 10);
    assert_eq!(detached.current_pax, 3);

    let history = engine.booking_history(b.booking.booking_id).unwrap();
    assert_eq!(
        history.last().unwrap().change,
        BookingChange::Conversion {
            before_type: DepartureType::Public,
            after_type: DepartureType::Private,
            from_departure: a.departure.departure_id,
            to_departure: converted.departure_id,
        }
    );
}

#[test]
fn test_conversion_over_private_ceiling_is_rejected() {
    let mut engine: Engine = create_test_engine();
    let mut request: JoinRequest = create_join_request(DepartureType::Public, 11, "a@example.com");
    request.force_new_departure = true;
    request.max_pax = Some(12);
    let joined: JoinResponse = engine
        .create_or_join_departure(&request, &create_test_actor())
        .unwrap();

    let err: EngineError = engine
        .convert_booking_type(
            joined.booking.booking_id,
            DepartureType::Private,
            None,
            &create_test_actor(),
        )
        .unwrap_err();

    assert_eq!(err.code(), "CAPACITY_EXCEEDED");
    assert_eq!(
        engine.get_departure(joined.departure.departure_id).unwrap().departure_type,
        DepartureType::Public
    );
}

#[test]
fn test_conversion_to_current_type_is_a_no_op() {
    let mut engine: Engine = create_test_engine();
    let joined: JoinResponse = join_public(&mut engine, 2, "a@example.com");

    let same: Booking = engine
        .convert_booking_type(
            joined.booking.booking_id,
            DepartureType::Public,
            None,
            &create_test_actor(),
        )
        .unwrap();

    assert_eq!(same.departure_id, joined.departure.departure_id);
    assert_eq!(engine.booking_history(same.booking_id).unwrap().len(), 1);
}

#[test]
fn test_cancel_departure_cancels_every_booking() {
    let mut engine: Engine = create_test_engine();
    let actor: Actor = create_test_actor();
    let a: JoinResponse = join_public(&mut engine, 2, "a@example.com");
    let b: JoinResponse = join_public(&mut engine, 3, "b@example.com");
    let departure_id = a.departure.departure_id;

    let cancelled: Departure = engine
        .cancel_departure(departure_id, &actor, Some("weather"))
        .unwrap();

    assert_eq!(cancelled.status, DepartureStatus::Cancelled);
    assert_eq!(cancelled.current_pax, 0);
    let bookings: Vec<Booking> = engine.list_bookings(departure_id).unwrap();
    assert_eq!(bookings.len(), 2);
    assert!(
        bookings
            .iter()
            .all(|booking| booking.status == BookingStatus::Cancelled)
    );
    assert!(
        bookings
            .iter()
            .any(|booking| booking.booking_id == b.booking.booking_id)
    );

    let err: EngineError = engine.cancel_departure(departure_id, &actor, None).unwrap_err();
    assert_eq!(err, EngineError::DepartureCancelled { departure_id });

    // A cancelled departure is never joined again.
    let next: JoinResponse = join_public(&mut engine, 1, "c@example.com");
    assert_ne!(next.departure.departure_id, departure_id);
}

#[test]
fn test_invariants_hold_after_mixed_operations() {
    let mut engine: Engine = create_test_engine();
    let actor: Actor = create_test_actor();
    let a: JoinResponse = join_public(&mut engine, 2, "a@example.com");
    let b: JoinResponse = join_public(&mut engine, 3, "b@example.com");
    join_public(&mut engine, 1, "c@example.com");

    engine.update_booking_pax(a.booking.booking_id, 4, &actor).unwrap();
    engine.cancel_booking(b.booking.booking_id, &actor, None).unwrap();

    let report: InvariantReport = engine
        .verify_departure_invariants(a.departure.departure_id)
        .unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.current_pax, 5);
    assert_eq!(report.active_pax, 5);

    for departure in engine
        .list_departures(TourId::new(1), Some(create_test_date()))
        .unwrap()
    {
        assert!(
            engine
                .verify_departure_invariants(departure.departure_id)
                .unwrap()
                .is_consistent()
        );
    }
}
