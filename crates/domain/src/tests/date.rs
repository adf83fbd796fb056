// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::{date, datetime};

use crate::{DepartureDate, DomainError};

#[test]
fn test_plain_calendar_day_parses() {
    let parsed: DepartureDate = DepartureDate::parse("2026-03-10", None).unwrap();
    assert_eq!(parsed.date(), date!(2026 - 03 - 10));
}

#[test]
fn test_local_midnight_keeps_client_day() {
    // 2026-03-09T22:00Z in UTC, but the client picked the 10th
    let parsed: DepartureDate = DepartureDate::parse("2026-03-10T00:00:00+02:00", None).unwrap();
    assert_eq!(parsed.date(), date!(2026 - 03 - 10));
}

#[test]
fn test_named_timezone_overrides_instant_offset() {
    let parsed: DepartureDate =
        DepartureDate::parse("2026-03-10T02:00:00Z", Some("America/Sao_Paulo")).unwrap();
    assert_eq!(parsed.date(), date!(2026 - 03 - 09));
}

#[test]
fn test_unknown_timezone_rejected() {
    let result = DepartureDate::parse("2026-03-10T02:00:00Z", Some("Mars/Olympus"));
    assert_eq!(
        result,
        Err(DomainError::InvalidTimezone(String::from("Mars/Olympus")))
    );
}

#[test]
fn test_garbage_rejected() {
    let result = DepartureDate::parse("next tuesday", None);
    assert!(matches!(result, Err(DomainError::DateParseError { .. })));
}

#[test]
fn test_reference_instant_is_noon_utc() {
    let departure_date: DepartureDate = DepartureDate::new(date!(2026 - 03 - 10));
    assert_eq!(
        departure_date.reference_instant(),
        datetime!(2026-03-10 12:00 UTC)
    );
}

#[test]
fn test_storage_round_trip() {
    let departure_date: DepartureDate = DepartureDate::new(date!(2026 - 12 - 31));
    let stored: String = departure_date.to_string();
    assert_eq!(stored, "2026-12-31");
    assert_eq!(DepartureDate::from_storage(&stored).unwrap(), departure_date);
}
