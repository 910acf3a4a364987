// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_error_display_messages() {
    assert_eq!(
        DomainError::InvalidName(String::from("Name cannot be empty")).to_string(),
        "Invalid name: Name cannot be empty"
    );
    assert_eq!(
        DomainError::InvalidStatus(String::from("away")).to_string(),
        "Invalid seller status 'away'. Must be one of: available, busy, offline"
    );
    assert_eq!(
        DomainError::InvalidMaxClients { value: 0 }.to_string(),
        "Invalid max clients: 0. Must be greater than 0"
    );
    assert_eq!(
        DomainError::InvalidWeekday(9).to_string(),
        "Invalid weekday 9. Must be between 0 and 6"
    );
    assert_eq!(
        DomainError::InvalidTimezone(String::from("Mars/Olympus")).to_string(),
        "Invalid timezone: Mars/Olympus"
    );
}

#[test]
fn test_error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(DomainError::InvalidTime(String::from("9am")));
    assert_eq!(err.to_string(), "Invalid time '9am'. Expected HH:MM");
}
