// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, TimeZone, Utc};
use cocolu::{ConversationRequest, DeskConfig, DeskSnapshot, SellerDesk};
use cocolu_domain::{
    BusinessClock, Contact, ConversationId, DaysOff, ScheduleTime, Seller, SellerId, SellerStatus,
    Specialty, WorkSchedule,
};

pub fn create_test_config() -> DeskConfig {
    DeskConfig::new(BusinessClock::from_name("America/Caracas").unwrap())
}

/// Monday 2026-03-02 10:00 in Caracas.
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap()
}

pub fn create_test_seller(number: u64, specialty: &str) -> Seller {
    let mut days_off: DaysOff = DaysOff::new();
    days_off.insert(
        chrono::NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
        Some(String::from("Nochebuena")),
    );
    Seller {
        id: SellerId::from_number(number),
        name: format!("Seller {number}"),
        contact: Contact::default(),
        notes: String::new(),
        specialty: Specialty::new(specialty),
        status: SellerStatus::Available,
        max_clients: 5,
        current_clients: 0,
        rating: 4.5,
        work_schedule: WorkSchedule::uniform(
            &[1, 2, 3, 4, 5],
            ScheduleTime::parse("09:00").unwrap(),
            ScheduleTime::parse("17:00").unwrap(),
        )
        .unwrap(),
        days_off,
        registered_seq: number,
    }
}

/// A desk with two sellers and one routed conversation.
pub fn create_test_desk() -> SellerDesk {
    let snapshot: DeskSnapshot = DeskSnapshot {
        sellers: vec![
            create_test_seller(1, "rings"),
            create_test_seller(2, "general"),
        ],
        ..DeskSnapshot::empty()
    };
    let desk: SellerDesk = SellerDesk::from_snapshot(create_test_config(), snapshot);
    desk.handle_new_conversation(
        &ConversationRequest::new(ConversationId::new("c1"), Some(Specialty::new("rings"))),
        monday_morning(),
    );
    desk
}

pub fn create_test_snapshot() -> DeskSnapshot {
    create_test_desk().snapshot(monday_morning())
}
