// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BusinessClock, Contact, DaysOff, ScheduleTime, Seller, SellerId, SellerStatus, Specialty,
    WorkSchedule,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Business clock fixed to Caracas (UTC-4, no DST).
pub fn create_test_clock() -> BusinessClock {
    BusinessClock::from_name("America/Caracas").unwrap()
}

/// Instant for a business-local wall-clock time.
pub fn local_instant(
    clock: &BusinessClock,
    date: (i32, u32, u32),
    hour: u32,
    minute: u32,
) -> DateTime<Utc> {
    clock
        .timezone()
        .with_ymd_and_hms(date.0, date.1, date.2, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn time(value: &str) -> ScheduleTime {
    ScheduleTime::parse(value).unwrap()
}

/// Monday to Friday, 09:00 to 17:00.
pub fn weekday_schedule() -> WorkSchedule {
    WorkSchedule::uniform(&[1, 2, 3, 4, 5], time("09:00"), time("17:00")).unwrap()
}

/// An available seller working weekdays 09:00-17:00 with room for 5 clients.
pub fn create_test_seller(number: u64) -> Seller {
    Seller {
        id: SellerId::from_number(number),
        name: format!("Seller {number}"),
        contact: Contact::default(),
        notes: String::new(),
        specialty: Specialty::general(),
        status: SellerStatus::Available,
        max_clients: 5,
        current_clients: 0,
        rating: 5.0,
        work_schedule: weekday_schedule(),
        days_off: DaysOff::new(),
        registered_seq: number,
    }
}
