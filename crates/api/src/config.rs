// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine configuration.
//!
//! `EngineConfig` deserializes with defaults for every field, so a host
//! application can embed it in its own configuration file and only name
//! the values it overrides.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tourbook::CapacityLimits;
use tourbook_persistence::{RetryPolicy, StoreOptions};

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    #[error("Failed to parse engine configuration: {0}")]
    Parse(String),

    /// A value is outside its allowed range.
    #[error("Invalid engine configuration: {field} {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Retry settings for conflicting transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per transaction, including the first.
    pub max_attempts: u32,
    /// Backoff before the first retry, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Cap on the backoff between attempts, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 5,
            max_backoff_ms: 100,
        }
    }
}

/// Tunables of the departure engine.
///
/// # Default Values
///
/// - `private_max_pax`: 10
/// - `default_public_max_pax`: 20
/// - `retry`: 5 attempts, 5ms initial backoff, 100ms cap
/// - `busy_timeout_ms`: 50
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of a private departure when no override is given.
    pub private_max_pax: u32,
    /// Capacity of a new public departure when no override is given.
    pub default_public_max_pax: u32,
    /// Retry settings for conflicting transactions.
    pub retry: RetryConfig,
    /// How long a statement waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            private_max_pax: 10,
            default_public_max_pax: 20,
            retry: RetryConfig::default(),
            busy_timeout_ms: 50,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON for this structure or
    /// a value fails validation.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A capacity ceiling is zero
    /// - `retry.max_attempts` is zero
    /// - `retry.initial_backoff_ms` exceeds `retry.max_backoff_ms`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.private_max_pax == 0 {
            return Err(ConfigError::Invalid {
                field: "private_max_pax",
                reason: String::from("must be at least 1"),
            });
        }

        if self.default_public_max_pax == 0 {
            return Err(ConfigError::Invalid {
                field: "default_public_max_pax",
                reason: String::from("must be at least 1"),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "retry.max_attempts",
                reason: String::from("must be at least 1"),
            });
        }

        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(ConfigError::Invalid {
                field: "retry.initial_backoff_ms",
                reason: format!(
                    "must not exceed retry.max_backoff_ms ({})",
                    self.retry.max_backoff_ms
                ),
            });
        }

        Ok(())
    }

    /// The capacity ceilings the transition rules apply.
    #[must_use]
    pub const fn capacity_limits(&self) -> CapacityLimits {
        CapacityLimits::new(self.private_max_pax, self.default_public_max_pax)
    }

    /// The connection settings the store is opened with.
    #[must_use]
    pub const fn store_options(&self) -> StoreOptions {
        StoreOptions {
            retry: RetryPolicy::new(
                self.retry.max_attempts,
                Duration::from_millis(self.retry.initial_backoff_ms),
                Duration::from_millis(self.retry.max_backoff_ms),
            ),
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }
}
