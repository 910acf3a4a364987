// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, validate_max_clients, validate_rating, validate_seller_name};

#[test]
fn test_seller_name_is_trimmed() {
    assert_eq!(validate_seller_name("  Ana Pérez ").unwrap(), "Ana Pérez");
}

#[test]
fn test_empty_seller_name_rejected() {
    assert!(matches!(
        validate_seller_name(""),
        Err(DomainError::InvalidName(_))
    ));
    assert!(matches!(
        validate_seller_name("   "),
        Err(DomainError::InvalidName(_))
    ));
}

#[test]
fn test_max_clients_must_be_positive() {
    assert_eq!(validate_max_clients(1).unwrap(), 1);
    assert_eq!(validate_max_clients(50).unwrap(), 50);
    assert_eq!(
        validate_max_clients(0),
        Err(DomainError::InvalidMaxClients { value: 0 })
    );
    assert_eq!(
        validate_max_clients(-3),
        Err(DomainError::InvalidMaxClients { value: -3 })
    );
}

#[test]
fn test_rating_range() {
    assert!(validate_rating(0.0).is_ok());
    assert!(validate_rating(4.5).is_ok());
    assert!(validate_rating(5.0).is_ok());
    assert!(validate_rating(5.1).is_err());
    assert!(validate_rating(-0.1).is_err());
    assert!(validate_rating(f64::NAN).is_err());
    assert!(validate_rating(f64::INFINITY).is_err());
}
