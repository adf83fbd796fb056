// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Departure date normalization.
//!
//! Clients send departure dates either as a calendar day (`2026-03-10`) or as
//! an instant produced by a date picker in the client's local timezone
//! (`2026-03-10T00:00:00+02:00`). Naively converting such an instant to UTC
//! lands on the previous day. This module always resolves the calendar day
//! the client meant, and pins its canonical instant to a fixed reference hour
//! in UTC.
//!
//! ## Invariants
//!
//! - Stored departure dates are calendar days, never instants
//! - The canonical instant of a day is `REFERENCE_HOUR:00` UTC on that day
//! - An instant is interpreted in the client's timezone when one is named,
//!   otherwise in the offset it carries

use crate::error::DomainError;
use chrono::{DateTime, Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::macros::{format_description, time};
use time::{Date, Month, OffsetDateTime, Time};

/// Hour of day (UTC) used as the canonical instant of a departure date.
pub const REFERENCE_HOUR: u8 = 12;

const REFERENCE_TIME: Time = time!(12:00);

/// A timezone-normalized calendar day on which a departure runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartureDate(Date);

impl DepartureDate {
    /// Wraps an already-normalized calendar day.
    #[must_use]
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parses client input into a departure date.
    ///
    /// # Arguments
    ///
    /// * `input` - A `YYYY-MM-DD` day or an RFC 3339 instant
    /// * `client_timezone` - Optional IANA zone the client picked the date in
    ///
    /// # Errors
    ///
    /// Returns an error if the input is neither format or the zone is unknown.
    pub fn parse(input: &str, client_timezone: Option<&str>) -> Result<Self, DomainError> {
        let trimmed: &str = input.trim();

        if let Ok(naive) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Self::from_naive(naive, trimmed);
        }

        let instant = DateTime::parse_from_rfc3339(trimmed).map_err(|e| {
            DomainError::DateParseError {
                date_string: trimmed.to_string(),
                error: e.to_string(),
            }
        })?;

        let local_day: NaiveDate = match client_timezone {
            Some(name) => {
                let tz: Tz = name
                    .parse()
                    .map_err(|_| DomainError::InvalidTimezone(name.to_string()))?;
                instant.with_timezone(&tz).date_naive()
            }
            None => instant.date_naive(),
        };

        Self::from_naive(local_day, trimmed)
    }

    /// Parses the stored `YYYY-MM-DD` representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid calendar day.
    pub fn from_storage(value: &str) -> Result<Self, DomainError> {
        Date::parse(value, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|e| DomainError::DateParseError {
                date_string: value.to_string(),
                error: e.to_string(),
            })
    }

    /// Returns the calendar day.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.0
    }

    /// Returns the canonical instant of this day (`REFERENCE_HOUR` UTC).
    #[must_use]
    pub const fn reference_instant(&self) -> OffsetDateTime {
        self.0.with_time(REFERENCE_TIME).assume_utc()
    }

    fn from_naive(naive: NaiveDate, original: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::DateParseError {
            date_string: original.to_string(),
            error: format!("{naive} is not representable"),
        };

        let month: Month = u8::try_from(naive.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(invalid)?;
        let day: u8 = u8::try_from(naive.day()).map_err(|_| invalid())?;

        Date::from_calendar_date(naive.year(), month, day)
            .map(Self)
            .map_err(|_| invalid())
    }
}

impl std::fmt::Display for DepartureDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
