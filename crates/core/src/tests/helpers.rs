// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DeskConfig, DeskSnapshot, NewSeller, SellerDesk, SellerRegistry};
use chrono::{DateTime, TimeZone, Utc};
use cocolu_audit::{Actor, Cause};
use cocolu_domain::{
    BusinessClock, Contact, DaysOff, ScheduleTime, Seller, SellerId, SellerStatus, Specialty,
    WorkSchedule,
};

// 2026-03-02 is a Monday.
pub const MONDAY: (i32, u32, u32) = (2026, 3, 2);
pub const SATURDAY: (i32, u32, u32) = (2026, 3, 7);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

/// Business clock fixed to Caracas (UTC-4, no DST).
pub fn create_test_clock() -> BusinessClock {
    BusinessClock::from_name("America/Caracas").unwrap()
}

pub fn create_test_config() -> DeskConfig {
    DeskConfig::new(create_test_clock())
}

/// Instant for a Caracas wall-clock time.
pub fn local_instant(date: (i32, u32, u32), hour: u32, minute: u32) -> DateTime<Utc> {
    create_test_clock()
        .timezone()
        .with_ymd_and_hms(date.0, date.1, date.2, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn time(value: &str) -> ScheduleTime {
    ScheduleTime::parse(value).unwrap()
}

/// Monday to Friday, 09:00 to 17:00.
pub fn weekday_schedule() -> WorkSchedule {
    WorkSchedule::uniform(&[1, 2, 3, 4, 5], time("09:00"), time("17:00")).unwrap()
}

/// Every day, all day.
pub fn always_schedule() -> WorkSchedule {
    WorkSchedule::uniform(&[0, 1, 2, 3, 4, 5, 6], time("00:00"), time("24:00")).unwrap()
}

pub fn create_new_seller(name: &str) -> NewSeller {
    NewSeller {
        name: String::from(name),
        ..NewSeller::default()
    }
}

/// An available general seller working weekdays 09:00-17:00 with room for 5.
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

pub fn create_test_registry(sellers: Vec<Seller>) -> SellerRegistry {
    let mut registry: SellerRegistry = SellerRegistry::default();
    registry.restore_state(crate::RegistrySnapshot {
        next_seller_number: 1,
        sellers,
    });
    registry
}

pub fn create_test_desk(sellers: Vec<Seller>) -> SellerDesk {
    let snapshot: DeskSnapshot = DeskSnapshot {
        sellers,
        ..DeskSnapshot::empty()
    };
    SellerDesk::from_snapshot(create_test_config(), snapshot)
}

/// Seller A: rings, Mondays 09:00-17:00, room for 2.
pub fn create_ring_specialist() -> Seller {
    let mut seller: Seller = create_test_seller(1);
    seller.name = String::from("Ana");
    seller.specialty = Specialty::new("rings");
    seller.max_clients = 2;
    seller.work_schedule = WorkSchedule::uniform(&[1], time("09:00"), time("17:00")).unwrap();
    seller
}

/// Seller B: general, always working, 4 of 5 clients.
pub fn create_busy_generalist() -> Seller {
    let mut seller: Seller = create_test_seller(2);
    seller.name = String::from("Beto");
    seller.max_clients = 5;
    seller.current_clients = 4;
    seller.work_schedule = always_schedule();
    seller
}
