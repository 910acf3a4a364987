// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod availability;
mod business_hours;
mod error;
mod schedule;
mod types;
mod validation;
mod workload;

#[cfg(test)]
mod tests;

pub use availability::{
    Availability, AvailabilitySnapshot, BusinessClock, DEFAULT_LOOKAHEAD_DAYS, UnavailableReason,
    availability_snapshot, is_available_now, is_working_now, next_availability,
};
pub use business_hours::BusinessHours;
pub use error::DomainError;
pub use schedule::{
    DAYS_PER_WEEK, DayOff, DaySchedule, DaysOff, ScheduleTime, WorkSchedule, parse_day_off_date,
    weekday_index,
};
pub use types::{
    Contact, ConversationId, DEFAULT_MAX_CLIENTS, DEFAULT_RATING, Seller, SellerId, SellerStatus,
    Specialty,
};
pub use validation::{validate_max_clients, validate_rating, validate_seller_name};
pub use workload::WorkloadEntry;
