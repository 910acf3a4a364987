// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Validates and normalizes a seller name.
///
/// # Arguments
///
/// * `name` - The raw name
///
/// # Returns
///
/// The trimmed name.
///
/// # Errors
///
/// Returns an error if the name is empty after trimming.
pub fn validate_seller_name(name: &str) -> Result<String, DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates a maximum client count.
///
/// # Errors
///
/// Returns an error if the value is below 1 or does not fit in a `u32`.
pub fn validate_max_clients(value: i64) -> Result<u32, DomainError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or(DomainError::InvalidMaxClients { value })
}

/// Validates a seller rating.
///
/// # Errors
///
/// Returns an error if the rating is not finite or outside `[0, 5]`.
pub fn validate_rating(rating: f64) -> Result<f64, DomainError> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(DomainError::InvalidRating(rating.to_string()));
    }
    Ok(rating)
}
