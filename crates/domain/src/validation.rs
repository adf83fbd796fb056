// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::Customer;

/// Validates a requested party size.
///
/// # Errors
///
/// Returns `DomainError::InvalidPax` if `pax` is zero.
pub const fn validate_pax(pax: u32) -> Result<(), DomainError> {
    if pax == 0 {
        return Err(DomainError::InvalidPax { pax });
    }
    Ok(())
}

/// Validates a departure capacity.
///
/// # Errors
///
/// Returns `DomainError::InvalidCapacity` if `max_pax` is zero.
pub const fn validate_capacity(max_pax: u32) -> Result<(), DomainError> {
    if max_pax == 0 {
        return Err(DomainError::InvalidCapacity { max_pax });
    }
    Ok(())
}

/// Validates that a customer record carries a name and a plausible email.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The email is empty or has no `@`
pub fn validate_customer(customer: &Customer) -> Result<(), DomainError> {
    if customer.name.is_empty() {
        return Err(DomainError::InvalidCustomer(String::from(
            "Name cannot be empty",
        )));
    }

    // Deliverability is the notification layer's problem
    if customer.email.is_empty() || !customer.email.contains('@') {
        return Err(DomainError::InvalidCustomer(format!(
            "'{}' is not an email address",
            customer.email
        )));
    }

    Ok(())
}
