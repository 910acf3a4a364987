// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_clock, create_test_seller, date, local_instant, time};
use crate::{
    Availability, AvailabilitySnapshot, BusinessClock, DaySchedule, Seller, SellerStatus,
    UnavailableReason, WorkSchedule, availability_snapshot, is_available_now, is_working_now,
    next_availability,
};
use chrono::{DateTime, TimeZone, Utc};

// 2026-03-02 is a Monday.
const MONDAY: (i32, u32, u32) = (2026, 3, 2);
const TUESDAY: (i32, u32, u32) = (2026, 3, 3);
const FRIDAY: (i32, u32, u32) = (2026, 3, 6);
const SATURDAY: (i32, u32, u32) = (2026, 3, 7);

fn unavailable(reason: UnavailableReason) -> Availability {
    Availability::Unavailable(reason)
}

#[test]
fn test_available_inside_working_hours() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    let result: Availability = is_available_now(&seller, now, &clock);

    assert_eq!(result, Availability::Available);
    assert!(result.is_available());
    assert_eq!(result.reason(), None);
    assert_eq!(result.as_str(), "available");
}

#[test]
fn test_offline_seller_is_unavailable_regardless_of_schedule() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.status = SellerStatus::Offline;
    seller.work_schedule =
        WorkSchedule::uniform(&[0, 1, 2, 3, 4, 5, 6], time("00:00"), time("24:00")).unwrap();

    for (day, hour) in [(MONDAY, 10), (SATURDAY, 3), (FRIDAY, 23)] {
        let now: DateTime<Utc> = local_instant(&clock, day, hour, 0);
        assert_eq!(
            is_available_now(&seller, now, &clock),
            unavailable(UnavailableReason::Offline)
        );
    }
}

#[test]
fn test_busy_seller_is_still_assignable() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.status = SellerStatus::Busy;

    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert!(is_available_now(&seller, now, &clock).is_available());
}

#[test]
fn test_day_off_overrides_working_hours() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller
        .days_off
        .insert(date(2026, 3, 2), Some(String::from("Medical")));

    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert_eq!(
        is_available_now(&seller, now, &clock),
        unavailable(UnavailableReason::DayOff)
    );
}

#[test]
fn test_day_off_on_another_date_has_no_effect() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.days_off.insert(date(2026, 3, 3), None);

    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert!(is_available_now(&seller, now, &clock).is_available());
}

#[test]
fn test_weekend_is_outside_schedule() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);
    let now: DateTime<Utc> = local_instant(&clock, SATURDAY, 10, 0);

    assert_eq!(
        is_available_now(&seller, now, &clock),
        unavailable(UnavailableReason::OutsideSchedule)
    );
}

#[test]
fn test_disabled_weekday_is_outside_schedule() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller
        .work_schedule
        .set(1, DaySchedule::parse(false, "09:00", "17:00").unwrap())
        .unwrap();

    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert_eq!(
        is_available_now(&seller, now, &clock),
        unavailable(UnavailableReason::OutsideSchedule)
    );
}

#[test]
fn test_window_boundaries_are_half_open() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);

    let before: DateTime<Utc> = local_instant(&clock, MONDAY, 8, 59);
    let opening: DateTime<Utc> = local_instant(&clock, MONDAY, 9, 0);
    let last_minute: DateTime<Utc> = local_instant(&clock, MONDAY, 16, 59);
    let closing: DateTime<Utc> = local_instant(&clock, MONDAY, 17, 0);

    assert_eq!(
        is_available_now(&seller, before, &clock),
        unavailable(UnavailableReason::OutsideHours)
    );
    assert!(is_available_now(&seller, opening, &clock).is_available());
    assert!(is_available_now(&seller, last_minute, &clock).is_available());
    assert_eq!(
        is_available_now(&seller, closing, &clock),
        unavailable(UnavailableReason::OutsideHours)
    );
}

#[test]
fn test_full_seller_is_at_capacity() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.current_clients = seller.max_clients;

    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert_eq!(
        is_available_now(&seller, now, &clock),
        unavailable(UnavailableReason::AtCapacity)
    );
    assert_eq!(UnavailableReason::AtCapacity.as_str(), "at capacity");
}

#[test]
fn test_checks_report_first_failure_in_order() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.current_clients = seller.max_clients;
    seller.days_off.insert(date(2026, 3, 2), None);

    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);
    assert_eq!(
        is_available_now(&seller, now, &clock),
        unavailable(UnavailableReason::DayOff)
    );

    seller.status = SellerStatus::Offline;
    assert_eq!(
        is_available_now(&seller, now, &clock),
        unavailable(UnavailableReason::Offline)
    );
}

#[test]
fn test_evaluation_uses_business_timezone_not_utc() {
    let caracas: BusinessClock = create_test_clock();
    let utc: BusinessClock = BusinessClock::new(chrono_tz::UTC);
    let seller: Seller = create_test_seller(1);

    // 12:30 UTC is 08:30 in Caracas.
    let now: DateTime<Utc> = Utc.with_ymd_and_hms(2026, 3, 2, 12, 30, 0).unwrap();

    assert_eq!(
        is_available_now(&seller, now, &caracas),
        unavailable(UnavailableReason::OutsideHours)
    );
    assert!(is_available_now(&seller, now, &utc).is_available());
}

#[test]
fn test_day_off_uses_business_local_date() {
    let caracas: BusinessClock = create_test_clock();
    let utc: BusinessClock = BusinessClock::new(chrono_tz::UTC);
    let mut seller: Seller = create_test_seller(1);
    seller.work_schedule =
        WorkSchedule::uniform(&[0, 1, 2, 3, 4, 5, 6], time("00:00"), time("24:00")).unwrap();
    seller.days_off.insert(date(2026, 3, 2), None);

    // 02:00 UTC on the 3rd is still the 2nd in Caracas.
    let now: DateTime<Utc> = Utc.with_ymd_and_hms(2026, 3, 3, 2, 0, 0).unwrap();

    assert_eq!(
        is_available_now(&seller, now, &caracas),
        unavailable(UnavailableReason::DayOff)
    );
    assert!(is_available_now(&seller, now, &utc).is_available());
}

#[test]
fn test_next_availability_is_now_inside_window() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert_eq!(next_availability(&seller, now, &clock, 14), Some(now));
}

#[test]
fn test_next_availability_later_today() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 7, 15);

    assert_eq!(
        next_availability(&seller, now, &clock, 14),
        Some(local_instant(&clock, MONDAY, 9, 0))
    );
}

#[test]
fn test_next_availability_after_hours_is_next_morning() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 20, 0);

    assert_eq!(
        next_availability(&seller, now, &clock, 14),
        Some(local_instant(&clock, TUESDAY, 9, 0))
    );
}

#[test]
fn test_next_availability_skips_weekend() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);
    let now: DateTime<Utc> = local_instant(&clock, FRIDAY, 18, 0);

    assert_eq!(
        next_availability(&seller, now, &clock, 14),
        Some(local_instant(&clock, (2026, 3, 9), 9, 0))
    );
}

#[test]
fn test_next_availability_skips_days_off() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.days_off.insert(date(2026, 3, 3), None);
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 20, 0);

    assert_eq!(
        next_availability(&seller, now, &clock, 14),
        Some(local_instant(&clock, (2026, 3, 4), 9, 0))
    );
}

#[test]
fn test_next_availability_ignores_status() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.status = SellerStatus::Offline;
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 20, 0);

    assert_eq!(
        next_availability(&seller, now, &clock, 14),
        Some(local_instant(&clock, TUESDAY, 9, 0))
    );
}

#[test]
fn test_next_availability_none_without_schedule() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.work_schedule = WorkSchedule::new();
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert_eq!(next_availability(&seller, now, &clock, 14), None);
}

#[test]
fn test_next_availability_none_beyond_lookahead() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);
    let now: DateTime<Utc> = local_instant(&clock, FRIDAY, 18, 0);

    // Friday evening with a one-day lookahead sees only Friday.
    assert_eq!(next_availability(&seller, now, &clock, 1), None);
    // Saturday and Sunday are not enough either.
    assert_eq!(next_availability(&seller, now, &clock, 3), None);
    assert!(next_availability(&seller, now, &clock, 4).is_some());
}

#[test]
fn test_next_availability_none_when_every_day_is_off() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    for day in 2..=20 {
        seller.days_off.insert(date(2026, 3, day), None);
    }
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert_eq!(next_availability(&seller, now, &clock, 14), None);
}

#[test]
fn test_next_availability_none_at_capacity() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.current_clients = seller.max_clients;
    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);

    assert_eq!(next_availability(&seller, now, &clock, 14), None);
}

#[test]
fn test_resolve_local_steps_over_dst_gap() {
    let clock: BusinessClock = BusinessClock::from_name("America/New_York").unwrap();

    // Clocks jump from 02:00 to 03:00 on 2026-03-08 in New York.
    let resolved: DateTime<Utc> = clock
        .resolve_local(date(2026, 3, 8), time("02:30"))
        .unwrap();

    // 03:00 EDT is 07:00 UTC.
    assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap());
}

#[test]
fn test_resolve_local_midnight_end_is_next_day() {
    let clock: BusinessClock = create_test_clock();

    let resolved: DateTime<Utc> = clock
        .resolve_local(date(2026, 3, 2), time("24:00"))
        .unwrap();

    assert_eq!(resolved, local_instant(&clock, TUESDAY, 0, 0));
}

#[test]
fn test_availability_snapshot_combines_checks() {
    let clock: BusinessClock = create_test_clock();
    let seller: Seller = create_test_seller(1);

    let open: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);
    let snapshot: AvailabilitySnapshot = availability_snapshot(&seller, open, &clock, 14);
    assert!(snapshot.is_available);
    assert_eq!(snapshot.reason, None);
    assert_eq!(snapshot.next_available_at, Some(open));

    let closed: DateTime<Utc> = local_instant(&clock, MONDAY, 20, 0);
    let snapshot: AvailabilitySnapshot = availability_snapshot(&seller, closed, &clock, 14);
    assert!(!snapshot.is_available);
    assert_eq!(snapshot.reason, Some(UnavailableReason::OutsideHours));
    assert_eq!(
        snapshot.next_available_at,
        Some(local_instant(&clock, TUESDAY, 9, 0))
    );
}

#[test]
fn test_availability_snapshot_serializes_reason_text() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.current_clients = seller.max_clients;

    let now: DateTime<Utc> = local_instant(&clock, MONDAY, 10, 0);
    let json: serde_json::Value =
        serde_json::to_value(availability_snapshot(&seller, now, &clock, 14)).unwrap();

    assert_eq!(json["isAvailable"], false);
    assert_eq!(json["reason"], "at capacity");
    assert!(json["nextAvailableAt"].is_null());
}

#[test]
fn test_is_working_now_ignores_status_and_capacity() {
    let clock: BusinessClock = create_test_clock();
    let mut seller: Seller = create_test_seller(1);
    seller.status = SellerStatus::Offline;
    seller.current_clients = seller.max_clients;

    assert!(is_working_now(
        &seller,
        local_instant(&clock, MONDAY, 10, 0),
        &clock
    ));
    assert!(!is_working_now(
        &seller,
        local_instant(&clock, SATURDAY, 10, 0),
        &clock
    ));
}
