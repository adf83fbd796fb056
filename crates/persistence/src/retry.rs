// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bounded exponential backoff for conflicting transactions.

use std::time::Duration;

/// How often, and how patiently, a conflicting transaction is retried.
///
/// # Default Values
///
/// - `max_attempts`: 5
/// - `initial_backoff`: 5ms
/// - `max_backoff`: 100ms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Cap on the delay between attempts.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(5),
            max_backoff: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Creates a retry policy.
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - Total attempts, including the first one
    /// * `initial_backoff` - Delay before the first retry
    /// * `max_backoff` - Cap on the delay between attempts
    #[must_use]
    pub const fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
        }
    }

    /// Returns the backoff before retrying after failed attempt `attempt`.
    ///
    /// Doubles from `initial_backoff` for each attempt, capped at
    /// `max_backoff`. No jitter is applied here.
    #[must_use]
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let factor: u32 = 1_u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }

    /// Returns the backoff for `attempt` with up to 50% random jitter added.
    #[must_use]
    pub fn jittered_backoff(&self, attempt: u32) -> Duration {
        let base: Duration = self.backoff_for_attempt(attempt);
        let spread_micros: u64 = u64::try_from(base.as_micros() / 2).unwrap_or(u64::MAX);
        if spread_micros == 0 {
            return base;
        }
        let jitter: u64 = rand::random::<u64>() % spread_micros.saturating_add(1);
        base.saturating_add(Duration::from_micros(jitter))
    }
}
