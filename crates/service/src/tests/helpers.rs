// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::cli::Args;
use crate::config::ServiceConfig;
use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use cocolu::{DeskSnapshot, SellerDesk};
use cocolu_domain::{
    Contact, DaysOff, ScheduleTime, Seller, SellerId, SellerStatus, Specialty, WorkSchedule,
};

pub fn parse_args(extra: &[&str]) -> Args {
    let mut argv: Vec<&str> = vec!["cocolu-service"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

pub fn create_test_config() -> ServiceConfig {
    ServiceConfig::from_args(&parse_args(&[])).unwrap()
}

/// Caracas wall-clock time on Monday 2026-03-02 (UTC-4).
pub fn monday_at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour + 4, 0, 0).unwrap()
}

pub fn create_test_seller(number: u64) -> Seller {
    Seller {
        id: SellerId::from_number(number),
        name: format!("Seller {number}"),
        contact: Contact::default(),
        notes: String::new(),
        specialty: Specialty::general(),
        status: SellerStatus::Available,
        max_clients: 3,
        current_clients: 0,
        rating: 5.0,
        work_schedule: WorkSchedule::uniform(
            &[1, 2, 3, 4, 5],
            ScheduleTime::parse("09:00").unwrap(),
            ScheduleTime::parse("17:00").unwrap(),
        )
        .unwrap(),
        days_off: DaysOff::new(),
        registered_seq: number,
    }
}

pub fn create_test_desk(sellers: Vec<Seller>) -> SellerDesk {
    SellerDesk::from_snapshot(
        create_test_config().desk,
        DeskSnapshot {
            sellers,
            ..DeskSnapshot::empty()
        },
    )
}
